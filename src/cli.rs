use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(name = "portal")]
#[command(about = "Chat with themed portals from the terminal", long_about = None)]
pub struct Args {
    #[arg(short = 'p', long = "portal", help = "Portal to open")]
    pub portal: Option<String>,

    #[arg(long = "list", help = "List portals and their progress")]
    pub list: bool,

    #[arg(long = "reset", value_name = "PORTAL", help = "Forget the saved progress of a portal")]
    pub reset: Option<String>,

    #[arg(long = "clear", help = "Clear all saved portal progress")]
    pub clear: bool,

    #[arg(long = "notes", help = "Save journal notes for the portal")]
    pub notes: Option<String>,

    #[arg(long = "speak", help = "Speak every answer")]
    pub speak: bool,

    #[arg(long = "listen", help = "Ask one question by voice")]
    pub listen: bool,

    #[arg(long = "health", help = "Check the answer service and exit")]
    pub health: bool,

    #[arg(long = "ephemeral", help = "Keep progress in memory only")]
    pub ephemeral: bool,

    #[arg(
        long = "api-endpoint",
        help = "Answer service base URL (e.g., http://localhost:7720)"
    )]
    pub api_endpoint: Option<String>,

    #[arg(long = "user-id", help = "User id sent with every question")]
    pub user_id: Option<String>,

    #[arg(short = 'v', long = "verbose", help = "Show debug logs")]
    pub verbose: bool,

    #[arg(long = "config-init", help = "Write an example config file")]
    pub config_init: bool,

    #[arg(help = "Question to ask")]
    pub question: Vec<String>,
}
