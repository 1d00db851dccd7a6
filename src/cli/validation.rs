use crate::cli::args::CliArgs;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(raw) = args.filter.as_deref() {
        if crate::filter::StatusFilter::parse(raw).is_none() {
            return Err(format!(
                "invalid --filter '{raw}': expected all, expired, soon, or active"
            ));
        }
    }
    if let Some(raw) = args.output_format.as_deref() {
        if crate::view::OutputFormat::parse(raw).is_none() {
            return Err(format!(
                "invalid --output-format '{raw}': expected text, json, or html"
            ));
        }
    }
    if let Some(raw) = args.issued.as_deref() {
        crate::utils::parse_date(raw).map_err(|e| format!("invalid --issued '{raw}': {e}"))?;
    }
    if let Some(raw) = args.expires.as_deref() {
        crate::utils::parse_date(raw).map_err(|e| format!("invalid --expires '{raw}': {e}"))?;
    }
    if args.add {
        let mut missing = Vec::new();
        if args.title.as_deref().map(str::trim).unwrap_or_default().is_empty() {
            missing.push("--title");
        }
        if args.provider.as_deref().map(str::trim).unwrap_or_default().is_empty() {
            missing.push("--provider");
        }
        if args.issued.is_none() {
            missing.push("--issued");
        }
        if args.expires.is_none() {
            missing.push("--expires");
        }
        if !missing.is_empty() {
            return Err(format!("--add requires {}", missing.join(", ")));
        }
    } else if args.title.is_some()
        || args.provider.is_some()
        || args.issued.is_some()
        || args.expires.is_some()
        || args.attach.is_some()
    {
        return Err("--title, --provider, --issued, --expires, and --attach require --add".to_string());
    }
    if args.add && args.show.is_some() {
        return Err("use either --show or --add, not both".to_string());
    }
    if args.interactive && (args.add || args.show.is_some()) {
        return Err("--interactive cannot be combined with --add or --show".to_string());
    }
    Ok(())
}
