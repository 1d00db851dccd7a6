use crate::filter::StatusFilter;
use crate::store::CertificateRecord;

fn json_for_script_tag(value: &str) -> String {
    value.replace("</", "<\\/")
}

pub fn render_html(records: &[CertificateRecord], filter: StatusFilter) -> Vec<u8> {
    let json = serde_json::to_string(records).unwrap_or_else(|_| "[]".to_string());
    let json = json_for_script_tag(&json);
    let initial_filter = filter.as_str();

    let html = format!(
        r####"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>Certificate Tracker</title>
  <script src="https://cdn.tailwindcss.com?plugins=forms,container-queries"></script>
  <link href="https://fonts.googleapis.com/css2?family=Material+Symbols+Outlined:wght,FILL@100..700,0..1&amp;display=swap" rel="stylesheet"/>
  <link href="https://fonts.googleapis.com/css2?family=Montserrat:wght@700;800&amp;family=Inter:wght@400;500;600;700&amp;display=swap" rel="stylesheet"/>
  <script id="tailwind-config">
    tailwind.config = {{
      darkMode: "class",
      theme: {{
        extend: {{
          colors: {{
            "primary": "#135bec",
            "background-light": "#f8fafc",
            "background-dark": "#0f172a"
          }},
          fontFamily: {{
            "sans": ["Inter", "sans-serif"],
            "display": ["Montserrat", "sans-serif"]
          }}
        }}
      }}
    }};
  </script>
  <style type="text/tailwindcss">
    .material-symbols-outlined {{
      font-variation-settings: 'FILL' 0, 'wght' 400, 'GRAD' 0, 'opsz' 24;
    }}
    body {{
      font-family: 'Inter', sans-serif;
    }}
    h1, h2, h3 {{
      font-family: 'Montserrat', sans-serif;
      font-weight: 800;
      letter-spacing: -0.025em;
    }}
  </style>
</head>
<body class="bg-background-light dark:bg-background-dark text-slate-900 dark:text-slate-100 min-h-screen transition-colors duration-200">
  <script type="application/json" id="certificates-data">{json}</script>
  <div class="layout-container flex h-full grow flex-col">
    <header class="flex items-center justify-between border-b border-slate-200 dark:border-slate-800 bg-white dark:bg-slate-900 px-8 py-4 sticky top-0 z-40">
      <div class="flex items-center gap-4">
        <div class="size-10 bg-primary rounded-xl flex items-center justify-center text-white shadow-lg shadow-primary/20">
          <span class="material-symbols-outlined text-[24px]">workspace_premium</span>
        </div>
        <h2 class="text-slate-900 dark:text-white text-xl font-display uppercase tracking-tight">Certificate Tracker</h2>
      </div>
      <div class="flex items-center gap-3">
        <button id="theme-toggle" class="flex size-10 cursor-pointer items-center justify-center overflow-hidden rounded-xl bg-slate-100 dark:bg-slate-800 text-slate-600 dark:text-white hover:bg-slate-200 dark:hover:bg-slate-700 transition-colors" type="button">
          <span id="theme-icon" class="material-symbols-outlined">light_mode</span>
        </button>
      </div>
    </header>

    <main class="flex-1 max-w-[1100px] mx-auto w-full px-8 py-10">
      <div class="flex flex-col md:flex-row justify-between items-start md:items-end mb-8 gap-4">
        <div>
          <h1 class="text-slate-900 dark:text-white text-5xl mb-2">MY CERTIFICATIONS</h1>
          <p class="text-slate-500 dark:text-slate-400 text-base font-medium">Expiry tracking with status filters.</p>
        </div>
        <span id="soon-badge" class="hidden bg-amber-100/50 dark:bg-amber-900/20 text-amber-700 dark:text-amber-400 px-4 py-2 rounded-xl text-xs font-bold border border-amber-200 dark:border-amber-900/30">0 expiring soon</span>
      </div>

      <div id="chips" class="flex flex-wrap items-center gap-3 mb-8">
        <button data-filter="all" type="button">All</button>
        <button data-filter="expired" type="button">Expired</button>
        <button data-filter="soon" type="button">Expiring Soon</button>
        <button data-filter="active" type="button">Active</button>
      </div>

      <noscript>
        <div class="bg-amber-50 dark:bg-amber-900/20 border border-amber-200 dark:border-amber-900/30 rounded-2xl p-5 mb-8">
          <div class="text-amber-800 dark:text-amber-300 font-bold">This page requires JavaScript to render certificates.</div>
        </div>
      </noscript>

      <div id="cards" class="grid grid-cols-1 md:grid-cols-2 xl:grid-cols-3 gap-5"></div>
      <div id="empty-state" class="hidden bg-white dark:bg-slate-900 border border-slate-200 dark:border-slate-800 rounded-2xl p-10 text-center text-slate-500 dark:text-slate-400 font-medium">No certificates found for this filter.</div>
    </main>

    <footer class="mt-auto py-8 border-t border-slate-200 dark:border-slate-800 text-center">
      <p class="text-xs font-bold text-slate-400 dark:text-slate-500 uppercase tracking-widest">CERTIFICATE TRACKER</p>
    </footer>
  </div>

  <div id="modal" class="hidden fixed inset-0 z-50 flex items-center justify-center p-6">
    <div id="modal-backdrop" class="absolute inset-0 bg-slate-900/60"></div>
    <div class="relative w-full max-w-md rounded-2xl border border-slate-200 dark:border-slate-800 bg-white dark:bg-slate-900 p-6 shadow-xl">
      <div class="flex items-start justify-between gap-4">
        <h3 id="modal-title" class="text-slate-900 dark:text-white text-2xl"></h3>
        <button id="modal-close" class="flex size-9 items-center justify-center rounded-lg hover:bg-slate-100 dark:hover:bg-slate-800 text-slate-500 dark:text-slate-400 transition-colors" type="button">
          <span class="material-symbols-outlined">close</span>
        </button>
      </div>
      <p id="modal-meta" class="mt-3 text-sm text-slate-500 dark:text-slate-400 font-medium"></p>
      <div id="modal-attachment" class="mt-5"></div>
    </div>
  </div>

  <script>
    (function() {{
      function escapeHtml(value) {{
        return String(value)
          .replaceAll('&', '&amp;')
          .replaceAll('<', '&lt;')
          .replaceAll('>', '&gt;')
          .replaceAll('"', '&quot;')
          .replaceAll("'", '&#39;');
      }}

      const DAY_MS = 1000 * 60 * 60 * 24;

      function daysLeft(expiryDate) {{
        return Math.ceil((new Date(expiryDate) - Date.now()) / DAY_MS);
      }}

      function getStatus(days) {{
        if (days < 0) return 'expired';
        if (days <= 60) return 'soon';
        return 'active';
      }}

      function statusLabel(status) {{
        const map = {{ expired: 'Expired', soon: 'Expiring Soon', active: 'Active' }};
        return map[status] || status;
      }}

      function statusClass(status) {{
        if (status === 'expired') return 'bg-rose-100/50 dark:bg-rose-900/20 text-rose-700 dark:text-rose-400';
        if (status === 'soon') return 'bg-amber-100/50 dark:bg-amber-900/20 text-amber-700 dark:text-amber-400';
        return 'bg-emerald-100/50 dark:bg-emerald-900/20 text-emerald-700 dark:text-emerald-400';
      }}

      function remainingClass(status) {{
        if (status === 'expired') return 'text-rose-600 dark:text-rose-400';
        if (status === 'soon') return 'text-amber-600 dark:text-amber-400';
        return 'text-emerald-600 dark:text-emerald-400';
      }}

      function formatDate(value) {{
        return new Date(value).toLocaleDateString('en-US', {{ year: 'numeric', month: 'short', day: 'numeric' }});
      }}

      function remainingLabel(days) {{
        return days < 0 ? `Expired ${{Math.abs(days)}} days ago` : `${{days}} days left`;
      }}

      const raw = document.getElementById('certificates-data').textContent || '[]';
      const records = JSON.parse(raw);

      const htmlEl = document.documentElement;
      const themeIcon = document.getElementById('theme-icon');
      function setTheme(mode) {{
        if (mode === 'dark') {{
          htmlEl.classList.add('dark');
          themeIcon.textContent = 'dark_mode';
        }} else {{
          htmlEl.classList.remove('dark');
          themeIcon.textContent = 'light_mode';
        }}
        localStorage.setItem('cw-theme', mode);
      }}
      const storedTheme = localStorage.getItem('cw-theme');
      if (storedTheme === 'dark' || storedTheme === 'light') {{
        setTheme(storedTheme);
      }} else {{
        setTheme(window.matchMedia && window.matchMedia('(prefers-color-scheme: dark)').matches ? 'dark' : 'light');
      }}
      document.getElementById('theme-toggle').addEventListener('click', function() {{
        setTheme(htmlEl.classList.contains('dark') ? 'light' : 'dark');
      }});

      const cardsHost = document.getElementById('cards');
      const emptyState = document.getElementById('empty-state');
      const soonBadge = document.getElementById('soon-badge');
      const chipsHost = document.getElementById('chips');
      const modal = document.getElementById('modal');
      const modalTitle = document.getElementById('modal-title');
      const modalMeta = document.getElementById('modal-meta');
      const modalAttachment = document.getElementById('modal-attachment');

      let activeFilter = '{initial_filter}';

      function applyChipStyles() {{
        for (const chip of chipsHost.querySelectorAll('button[data-filter]')) {{
          const active = chip.getAttribute('data-filter') === activeFilter;
          chip.className = active
            ? 'px-5 py-2.5 rounded-xl bg-primary text-white text-xs font-bold transition-all'
            : 'px-5 py-2.5 rounded-xl bg-white dark:bg-slate-900 border border-slate-200 dark:border-slate-700 text-slate-600 dark:text-slate-300 text-xs font-bold hover:border-primary hover:text-primary transition-all';
        }}
      }}

      function openModal(position) {{
        const cert = records[position];
        if (!cert) return;
        modalTitle.textContent = cert.title;
        modalMeta.textContent = `Provider: ${{cert.provider}} | Issue: ${{formatDate(cert.issueDate)}} | Expiry: ${{formatDate(cert.expiryDate)}}`;
        if (cert.fileUrl && cert.fileUrl !== '#') {{
          modalAttachment.innerHTML = `<a class="inline-flex items-center gap-2 rounded-xl bg-primary px-5 py-2.5 text-xs font-bold text-white hover:bg-primary/90 transition-colors" href="${{escapeHtml(cert.fileUrl)}}" target="_blank" rel="noreferrer"><span class="material-symbols-outlined text-[18px]">attachment</span>VIEW ATTACHMENT</a>`;
        }} else {{
          modalAttachment.innerHTML = '<span class="text-slate-400 italic text-xs font-bold">NO ATTACHMENT</span>';
        }}
        modal.classList.remove('hidden');
      }}

      function closeModal() {{
        modal.classList.add('hidden');
      }}

      function render() {{
        const entries = records.map(function(cert, position) {{
          const days = daysLeft(cert.expiryDate);
          return {{ cert: cert, position: position, days: days, status: getStatus(days) }};
        }});

        const soonCount = entries.filter(function(e) {{ return e.status === 'soon'; }}).length;
        soonBadge.textContent = `${{soonCount}} expiring soon`;
        soonBadge.classList.toggle('hidden', soonCount === 0);

        const visible = activeFilter === 'all'
          ? entries
          : entries.filter(function(e) {{ return e.status === activeFilter; }});

        emptyState.classList.toggle('hidden', visible.length !== 0);

        const cards = [];
        for (const e of visible) {{
          cards.push(
            `<div data-index="${{e.position}}" class="cursor-pointer rounded-2xl border border-slate-200 dark:border-slate-800 bg-white dark:bg-slate-900 p-5 shadow-sm hover:border-primary/60 transition-colors">
              <div class="flex items-start justify-between gap-4">
                <div class="min-w-0">
                  <div class="text-slate-900 dark:text-white font-bold truncate">${{escapeHtml(e.cert.title)}}</div>
                  <div class="text-xs text-slate-500 dark:text-slate-400 font-medium">${{escapeHtml(e.cert.provider)}}</div>
                </div>
                <span class="${{statusClass(e.status)}} px-3 py-1 rounded-lg text-xs font-bold whitespace-nowrap">${{statusLabel(e.status)}}</span>
              </div>
              <div class="mt-4 text-xs text-slate-500 dark:text-slate-400 font-medium">Issue: ${{escapeHtml(formatDate(e.cert.issueDate))}} | Expiry: ${{escapeHtml(formatDate(e.cert.expiryDate))}}</div>
              <div class="mt-1 text-sm font-bold ${{remainingClass(e.status)}}">${{remainingLabel(e.days)}}</div>
            </div>`
          );
        }}
        cardsHost.innerHTML = cards.join('');

        for (const el of cardsHost.querySelectorAll('div[data-index]')) {{
          el.addEventListener('click', function() {{
            openModal(Number(el.getAttribute('data-index') || 0));
          }});
        }}
      }}

      for (const chip of chipsHost.querySelectorAll('button[data-filter]')) {{
        chip.addEventListener('click', function() {{
          activeFilter = chip.getAttribute('data-filter') || 'all';
          applyChipStyles();
          render();
        }});
      }}

      document.getElementById('modal-close').addEventListener('click', closeModal);
      document.getElementById('modal-backdrop').addEventListener('click', closeModal);

      applyChipStyles();
      render();
    }})();
  </script>
</body>
</html>"####,
    );

    html.into_bytes()
}
