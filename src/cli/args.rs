use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "certwatch",
    version,
    about = "certificate expiry tracker",
    long_about = "Certwatch tracks certification expiry dates and renders them as status-filtered cards.\n\nExamples:\n  certwatch\n  certwatch -f soon\n  certwatch --add --title \"AWS SAA\" --provider \"Amazon Web Services\" --issued 2024-02-01 --expires 2027-02-01\n  certwatch -o certificates.html\n\nTip: Use --config to persist settings and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'f',
        long = "filter",
        value_name = "FILTER",
        help_heading = "View",
        help = "Status filter to apply (all, expired, soon, active)."
    )]
    pub filter: Option<String>,

    #[arg(
        long = "show",
        value_name = "INDEX",
        help_heading = "View",
        help = "Show one record's detail by its store position."
    )]
    pub show: Option<usize>,

    #[arg(
        short = 'a',
        long = "add",
        help_heading = "Add",
        help = "Add a certificate and exit (requires --title, --provider, --issued, --expires)."
    )]
    pub add: bool,

    #[arg(
        long = "title",
        value_name = "TEXT",
        help_heading = "Add",
        help = "Certificate title."
    )]
    pub title: Option<String>,

    #[arg(
        long = "provider",
        value_name = "TEXT",
        help_heading = "Add",
        help = "Issuing provider."
    )]
    pub provider: Option<String>,

    #[arg(
        long = "issued",
        value_name = "DATE",
        help_heading = "Add",
        help = "Issue date (YYYY-MM-DD)."
    )]
    pub issued: Option<String>,

    #[arg(
        long = "expires",
        value_name = "DATE",
        help_heading = "Add",
        help = "Expiry date (YYYY-MM-DD)."
    )]
    pub expires: Option<String>,

    #[arg(
        long = "attach",
        value_name = "FILE",
        help_heading = "Add",
        help = "Attachment file, stored inline as a data URI."
    )]
    pub attach: Option<String>,

    #[arg(
        short = 'i',
        long = "interactive",
        help_heading = "Session",
        help = "Run the interactive session (filter, show, close, add, list, quit)."
    )]
    pub interactive: bool,

    #[arg(
        short = 'd',
        long = "df",
        visible_alias = "data-file",
        value_name = "FILE",
        help_heading = "Input",
        help = "Records file (defaults to ~/.certwatch/certificates.json)."
    )]
    pub data_file: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.certwatch/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "update-config",
        help_heading = "Input",
        help = "Write the default config file if missing, then exit."
    )]
    pub update_config: bool,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the rendered view to a file."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'A',
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format (text, json, html)."
    )]
    pub output_format: Option<String>,

    #[arg(
        short = 'n',
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,
}
