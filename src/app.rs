use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use clap::{error::ErrorKind, CommandFactory, Parser};
use colored::Colorize;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task;

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::filter::StatusFilter;
use crate::intake::NewCertificate;
use crate::status::Status;
use crate::store;
use crate::tracker::{self, Tracker, TrackerEvent, TrackerOptions};
use crate::view::{self, DetailView, ListView, OutputFormat};

fn print_banner(no_color: bool) {
    let _ = no_color;
    const BANNER: &str = r#"
                    __                  __       __
  ________  _______/ /__      ______ _/ /______/ /_
 / ___/ _ \/ ___/ __/ | /| / / __ `/ __/ ___/ __ \
/ /__/  __/ /  / /_  | |/ |/ / /_/ / /_/ /__/ / / /
\___/\___/_/   \__/  |__/|__/\__,_/\__/\___/_/ /_/
       v0.3.1 - certificate expiry tracker
    "#;
    print!("{}", BANNER);
    println!();
}

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

fn render_custom_help() -> String {
    let cmd = CliArgs::command();
    let mut out = String::new();

    if let Some(version) = cmd.get_version() {
        out.push_str(cmd.get_name());
        out.push(' ');
        out.push_str(version);
        out.push('\n');
    } else {
        out.push_str(cmd.get_name());
        out.push('\n');
    }

    if let Some(about) = cmd.get_about() {
        out.push_str(&about.to_string());
        out.push('\n');
    }

    if let Some(long_about) = cmd.get_long_about() {
        out.push('\n');
        out.push_str(&long_about.to_string());
        out.push('\n');
    }

    out.push('\n');
    out.push_str("Usage: ");
    out.push_str(cmd.get_name());
    out.push_str(" [OPTIONS]\n\n");

    let mut sections: Vec<(String, Vec<&clap::Arg>)> = Vec::new();
    let mut section_idx: HashMap<String, usize> = HashMap::new();

    for arg in cmd.get_arguments() {
        if arg.is_hide_set() {
            continue;
        }

        let heading = arg.get_help_heading().unwrap_or("Options").to_string();

        let idx = match section_idx.get(&heading).copied() {
            Some(i) => i,
            None => {
                sections.push((heading.clone(), Vec::new()));
                let i = sections.len() - 1;
                section_idx.insert(heading, i);
                i
            }
        };

        sections[idx].1.push(arg);
    }

    for (heading, args) in sections {
        out.push_str(&heading);
        out.push_str(":\n");

        for arg in args {
            let mut parts: Vec<String> = Vec::new();

            if let Some(short) = arg.get_short() {
                parts.push(format!("-{short}"));
            }

            if let Some(long) = arg.get_long() {
                parts.push(format!("--{long}"));
            }

            if let Some(aliases) = arg.get_visible_aliases() {
                for alias in aliases {
                    let rendered = format!("--{alias}");
                    if !parts.iter().any(|p| p == &rendered) {
                        parts.push(rendered);
                    }
                }
            }

            let mut flags = parts.join(", ");

            if arg.get_action().takes_values() {
                let value_name = arg
                    .get_value_names()
                    .and_then(|names| names.first())
                    .map(|name| name.as_str())
                    .unwrap_or("VALUE");
                let placeholder = format!("<{value_name}>");
                let min_values = arg.get_num_args().map(|r| r.min_values()).unwrap_or(1);

                if min_values == 0 {
                    flags.push(' ');
                    flags.push('[');
                    flags.push_str(&placeholder);
                    flags.push(']');
                } else {
                    flags.push(' ');
                    flags.push_str(&placeholder);
                }
            }

            out.push_str("  ");
            out.push_str(&flags);
            out.push('\n');

            if let Some(help) = arg.get_help() {
                let help = help.to_string();
                if !help.trim().is_empty() {
                    out.push_str("          ");
                    out.push_str(help.trim());
                    out.push('\n');
                }
            }

            out.push('\n');
        }
    }

    out
}

fn format_label(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Text => "text",
        OutputFormat::Json => "json",
        OutputFormat::Html => "html",
    }
}

fn paint_status(status: Status, label: &str) -> colored::ColoredString {
    match status {
        Status::Expired => label.red(),
        Status::Soon => label.yellow(),
        Status::Active => label.green(),
    }
}

fn print_cards(list: &ListView) {
    if list.cards.is_empty() {
        println!("{}", view::EMPTY_FILTER_MESSAGE);
        return;
    }
    for card in list.cards.iter() {
        println!(
            "#{} [{}] {} ({})",
            card.index,
            paint_status(card.status, card.status_label),
            card.title,
            card.provider
        );
        println!("    Issue: {} | Expiry: {}", card.issued, card.expires);
        println!("    {}", card.remaining);
    }
}

fn print_detail(detail: &DetailView) {
    println!("#{} {}", detail.index, detail.title);
    println!("{}", detail.meta);
    if detail.file_url == store::NO_ATTACHMENT {
        println!("Attachment: none");
    } else {
        println!("Attachment: {}", summarize_attachment(&detail.file_url));
    }
}

// The stored data URI can run to megabytes, so only its shape is shown.
fn summarize_attachment(file_url: &str) -> String {
    let mime = file_url
        .strip_prefix("data:")
        .and_then(|rest| rest.split(';').next())
        .unwrap_or("unknown");
    format!("{mime} ({} bytes inline)", file_url.len())
}

#[derive(Clone, Debug)]
struct RunConfig {
    data_file: PathBuf,
    filter: StatusFilter,
    show: Option<usize>,
    add: Option<NewCertificate>,
    interactive: bool,
    output: Option<String>,
    output_format: Option<String>,
    notice_ms: u64,
    no_color: bool,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = args.no_color || cfg.no_color.unwrap_or(false);

    let filter_raw = args
        .filter
        .or(cfg.default_filter)
        .unwrap_or_else(|| "all".to_string());
    let filter = StatusFilter::parse(&filter_raw).ok_or_else(|| {
        format!("invalid --filter '{filter_raw}': expected all, expired, soon, or active")
    })?;

    let data_file = args
        .data_file
        .or(cfg.data_file)
        .map(|p| config::expand_tilde(&p))
        .or_else(config::default_data_path)
        .unwrap_or_else(|| PathBuf::from("certificates.json"));

    let notice_ms = cfg.notice_ms.unwrap_or(tracker::DEFAULT_NOTICE_MS);

    let add = if args.add {
        let issued_raw = args.issued.unwrap_or_default();
        let issue_date = crate::utils::parse_date(&issued_raw)
            .map_err(|e| format!("invalid --issued '{issued_raw}': {e}"))?;
        let expires_raw = args.expires.unwrap_or_default();
        let expiry_date = crate::utils::parse_date(&expires_raw)
            .map_err(|e| format!("invalid --expires '{expires_raw}': {e}"))?;
        Some(NewCertificate {
            title: args.title.unwrap_or_default().trim().to_string(),
            provider: args.provider.unwrap_or_default().trim().to_string(),
            issue_date,
            expiry_date,
            attachment: args.attach.map(|p| config::expand_tilde(&p)),
        })
    } else {
        None
    };

    let output = args
        .output
        .or(cfg.output)
        .map(|p| config::expand_tilde_string(&p));
    let output_format = args.output_format.or(cfg.output_format);

    Ok(RunConfig {
        data_file,
        filter,
        show: args.show,
        add,
        interactive: args.interactive,
        output,
        output_format,
        notice_ms,
        no_color,
    })
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }

    let format = run
        .output_format
        .as_deref()
        .and_then(OutputFormat::parse)
        .or_else(|| run.output.as_deref().and_then(view::infer_format_from_path))
        .unwrap_or(OutputFormat::Text);

    let mut tracker = Tracker::new(TrackerOptions {
        data_file: run.data_file.clone(),
        filter: run.filter,
        notice_ms: run.notice_ms,
    })
    .map_err(|e| e.to_string())?;

    if let Some(input) = run.add.clone() {
        tracker.submit(input).await.map_err(|e| e.to_string())?;
    }

    // Banner and summary lines never mix into json or html on stdout.
    let print_summary = run.interactive || run.output.is_some() || format == OutputFormat::Text;
    if print_summary {
        print_banner(run.no_color);
        format_kv_line(
            "Store",
            &format!(
                "{} ({} records)",
                tracker.store().path().display(),
                tracker.store().len()
            ),
        );
    }

    if run.interactive {
        return run_session(tracker).await;
    }

    if print_summary {
        let list = tracker.list_view();
        format_kv_line(
            "View",
            &format!(
                "filter={} format={} soon={}",
                list.filter,
                format_label(format),
                list.soon_count
            ),
        );
        if let Some(notice) = tracker.notice() {
            format_kv_line("Notice", &notice.text);
        }
        println!();
    }

    if let Some(index) = run.show {
        tracker
            .apply(TrackerEvent::Open(index))
            .await
            .map_err(|e| e.to_string())?;
        let detail = tracker
            .detail_view()
            .ok_or_else(|| format!("no record at index {index}"))?;
        print_detail(&detail);
        return Ok(());
    }

    let list = tracker.list_view();
    let rendered = match format {
        OutputFormat::Text => view::render_text(&list),
        OutputFormat::Json => view::render_json(&list),
        OutputFormat::Html => view::render_html(tracker.store().records(), tracker.filter()),
    };

    match run.output.as_ref() {
        Some(outfile_path) => {
            let mut outfile = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(outfile_path)
                .await
                .map_err(|e| format!("failed to open output file: {e}"))?;
            outfile
                .write_all(&rendered)
                .await
                .map_err(|_| "failed to write output file".to_string())?;
            format_kv_line("Saved", outfile_path);
        }
        None if format == OutputFormat::Text => print_cards(&list),
        None => {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(&rendered)
                .await
                .map_err(|_| "failed to write output".to_string())?;
        }
    }

    Ok(())
}

#[derive(Debug)]
enum FormStep {
    Title,
    Provider {
        title: String,
    },
    Issued {
        title: String,
        provider: String,
    },
    Expires {
        title: String,
        provider: String,
        issue_date: NaiveDate,
    },
    Attachment {
        title: String,
        provider: String,
        issue_date: NaiveDate,
        expiry_date: NaiveDate,
    },
}

fn form_prompt(step: &FormStep) -> &'static str {
    match step {
        FormStep::Title => "Title: ",
        FormStep::Provider { .. } => "Provider: ",
        FormStep::Issued { .. } => "Issue date (YYYY-MM-DD): ",
        FormStep::Expires { .. } => "Expiry date (YYYY-MM-DD): ",
        FormStep::Attachment { .. } => "Attachment path (empty for none): ",
    }
}

fn prompt(step: Option<&FormStep>) {
    match step {
        Some(step) => print!("{}", form_prompt(step)),
        None => print!("> "),
    }
    let _ = std::io::stdout().flush();
}

fn schedule_notice_expiry(event_tx: &mpsc::Sender<TrackerEvent>, seq: u64, after: Duration) {
    let tx = event_tx.clone();
    task::spawn(async move {
        tokio::time::sleep(after).await;
        let _ = tx.send(TrackerEvent::NoticeExpired(seq)).await;
    });
}

async fn advance_form(
    tracker: &mut Tracker,
    event_tx: &mpsc::Sender<TrackerEvent>,
    step: FormStep,
    line: &str,
) -> Option<FormStep> {
    if line.eq_ignore_ascii_case("cancel") {
        println!("add cancelled");
        return None;
    }
    match step {
        FormStep::Title => {
            if line.is_empty() {
                println!("title cannot be empty");
                return Some(FormStep::Title);
            }
            Some(FormStep::Provider {
                title: line.to_string(),
            })
        }
        FormStep::Provider { title } => {
            if line.is_empty() {
                println!("provider cannot be empty");
                return Some(FormStep::Provider { title });
            }
            Some(FormStep::Issued {
                title,
                provider: line.to_string(),
            })
        }
        FormStep::Issued { title, provider } => match crate::utils::parse_date(line) {
            Ok(issue_date) => Some(FormStep::Expires {
                title,
                provider,
                issue_date,
            }),
            Err(e) => {
                println!("invalid date: {e}");
                Some(FormStep::Issued { title, provider })
            }
        },
        FormStep::Expires {
            title,
            provider,
            issue_date,
        } => match crate::utils::parse_date(line) {
            Ok(expiry_date) => Some(FormStep::Attachment {
                title,
                provider,
                issue_date,
                expiry_date,
            }),
            Err(e) => {
                println!("invalid date: {e}");
                Some(FormStep::Expires {
                    title,
                    provider,
                    issue_date,
                })
            }
        },
        FormStep::Attachment {
            title,
            provider,
            issue_date,
            expiry_date,
        } => {
            let attachment = if line.is_empty() {
                None
            } else {
                Some(config::expand_tilde(line))
            };
            let input = NewCertificate {
                title: title.clone(),
                provider: provider.clone(),
                issue_date,
                expiry_date,
                attachment,
            };
            match tracker.submit(input).await {
                Ok(_) => {
                    if let Some(notice) = tracker.notice() {
                        schedule_notice_expiry(event_tx, notice.seq, tracker.notice_duration());
                    }
                    None
                }
                Err(e) => {
                    println!("add failed: {e}");
                    Some(FormStep::Attachment {
                        title,
                        provider,
                        issue_date,
                        expiry_date,
                    })
                }
            }
        }
    }
}


enum SessionAction {
    Stay,
    Redraw,
    StartForm,
    Quit,
}

async fn dispatch_command(tracker: &mut Tracker, line: &str) -> SessionAction {
    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or("");
    let argument = parts.next().unwrap_or("");
    match command {
        "" => SessionAction::Stay,
        "list" | "ls" => SessionAction::Redraw,
        "filter" | "f" => match StatusFilter::parse(argument) {
            Some(filter) => {
                let _ = tracker.apply(TrackerEvent::Filter(filter)).await;
                SessionAction::Redraw
            }
            None => {
                println!("invalid filter '{argument}': expected all, expired, soon, or active");
                SessionAction::Stay
            }
        },
        "show" | "open" => match crate::utils::parse_index(argument) {
            Ok(index) => match tracker.apply(TrackerEvent::Open(index)).await {
                Ok(()) => SessionAction::Redraw,
                Err(e) => {
                    println!("{e}");
                    SessionAction::Stay
                }
            },
            Err(e) => {
                println!("invalid index '{argument}': {e}");
                SessionAction::Stay
            }
        },
        "close" => {
            let _ = tracker.apply(TrackerEvent::CloseDetail).await;
            SessionAction::Redraw
        }
        "add" => SessionAction::StartForm,
        "quit" | "q" | "exit" => SessionAction::Quit,
        _ => {
            println!("unknown command '{command}' (try: list, filter, show, close, add, quit)");
            SessionAction::Stay
        }
    }
}

fn print_view(tracker: &Tracker) {
    let list = tracker.list_view();
    println!();
    format_kv_line(
        "View",
        &format!(
            "filter={} total={} soon={}",
            list.filter, list.total, list.soon_count
        ),
    );
    if let Some(notice) = tracker.notice() {
        println!("{}", notice.text.green());
    }
    print_cards(&list);
    if let Some(detail) = tracker.detail_view() {
        print_detail(&detail);
    }
}

async fn run_session(mut tracker: Tracker) -> Result<(), String> {
    let (event_tx, mut event_rx) = mpsc::channel::<TrackerEvent>(16);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut form: Option<FormStep> = None;

    println!("commands: list, filter <all|expired|soon|active>, show <index>, close, add, quit");
    print_view(&tracker);
    prompt(form.as_ref());

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = line.map_err(|e| format!("failed to read input: {e}"))?;
                let Some(line) = line else { break };
                let trimmed = line.trim();
                match form.take() {
                    Some(step) => {
                        form = advance_form(&mut tracker, &event_tx, step, trimmed).await;
                        if form.is_none() {
                            print_view(&tracker);
                        }
                    }
                    None => match dispatch_command(&mut tracker, trimmed).await {
                        SessionAction::Stay => {}
                        SessionAction::Redraw => print_view(&tracker),
                        SessionAction::StartForm => {
                            println!("adding a certificate (type cancel to abort)");
                            form = Some(FormStep::Title);
                        }
                        SessionAction::Quit => break,
                    },
                }
                prompt(form.as_ref());
            }
            Some(event) = event_rx.recv() => {
                let had_notice = tracker.notice().is_some();
                if let Err(e) = tracker.apply(event).await {
                    println!("{e}");
                }
                if had_notice && tracker.notice().is_none() {
                    print_view(&tracker);
                    prompt(form.as_ref());
                }
            }
        }
    }
    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp => {
                print!("{}", render_custom_help());
                return Ok(());
            }
            ErrorKind::DisplayVersion => {
                let cmd = CliArgs::command();
                print!("{}", cmd.render_version());
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    let user_config_path = args.config.clone().map(|p| config::expand_tilde(&p));

    if args.update_config {
        let path = user_config_path
            .clone()
            .or_else(config::default_config_path)
            .ok_or_else(|| "could not resolve the config path".to_string())?;
        config::ensure_default_config_file(&path)?;
        println!("config file ready at {}", path.display());
        return Ok(());
    }

    let cfg = match user_config_path.as_ref() {
        Some(path) => config::load_config(path, false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))?;
    Ok(())
}
