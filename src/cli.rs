use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "toolcall")]
#[command(
    about = "Ask a chat model a question and run the tools it calls",
    long_about = "Sends a prompt to an OpenAI-compatible chat-completion API together with the \
                  `multiply` and `getWeatherFromCoords` tools, executes every tool call the model \
                  returns and prints the results. Without a prompt, runs the two built-in demo prompts."
)]
pub struct Args {
    #[arg(short = 'm', long = "model", help = "Model name to request")]
    pub model: Option<String>,

    #[arg(
        long = "api-endpoint",
        help = "Custom API base URL (e.g., http://localhost:11434/v1)"
    )]
    pub api_endpoint: Option<String>,

    #[arg(long = "temperature", help = "Sampling temperature (default 0)")]
    pub temperature: Option<f32>,

    #[arg(long = "weather-url", help = "Base URL of the Open-Meteo compatible weather API")]
    pub weather_url: Option<String>,

    #[arg(
        short = 'f',
        long = "follow-up",
        help = "Send tool results back to the model until it answers without tools"
    )]
    pub follow_up: bool,

    #[arg(
        long = "max-rounds",
        help = "Maximum model requests per prompt in follow-up mode"
    )]
    pub max_rounds: Option<usize>,

    #[arg(short = 'v', long = "verbose", help = "Log requests and tool selection to stderr")]
    pub verbose: bool,

    #[arg(long = "config", help = "Read configuration from this file")]
    pub config: Option<PathBuf>,

    #[arg(long = "config-init", help = "Write an example config file and exit")]
    pub config_init: bool,

    #[arg(help = "Prompt to send to the model")]
    pub prompt: Vec<String>,
}
