use clap::Parser;
use colored::*;
use std::process;

use toolcall::cli::Args;
use toolcall::config::{load_dotenv, Config, FileConfig};
use toolcall::ui::{
    display_content, display_error, display_no_output, display_section, display_tool_call,
    display_tool_error, display_tool_result, display_warning,
};
use toolcall::{logging, DispatchOutcome, Dispatcher};

const DEMO_PROMPTS: [(&str, &str); 2] = [
    ("Multiply Tool Usage", "What is 15 multiplied by 23?"),
    (
        "Weather Tool Usage",
        "What is the current weather at 36.9741, 122.0288?",
    ),
];

#[tokio::main]
async fn main() {
    // A missing .env file is fine; the environment may already be set
    if let Err(e) = load_dotenv() {
        display_warning(&e.to_string());
    }

    let args = Args::parse();

    if args.config_init {
        match init_config_file(&args) {
            Ok(path) => {
                println!("{}", format!("Wrote example config to {}", path).green());
                return;
            }
            Err(e) => {
                display_error(&format!("{:#}", e));
                process::exit(1);
            }
        }
    }

    let config = match Config::from_env_and_args(&args) {
        Ok(config) => config,
        Err(e) => {
            display_error(&e.to_string());
            process::exit(1);
        }
    };

    logging::init(config.verbose);
    tracing::debug!(
        model = %config.model,
        endpoint = %config.api_endpoint,
        follow_up = config.follow_up,
        "configuration loaded"
    );

    let dispatcher = match Dispatcher::from_config(&config) {
        Ok(dispatcher) => dispatcher,
        Err(e) => {
            display_error(&e.to_string());
            process::exit(1);
        }
    };

    tracing::debug!(tools = %dispatcher.registry().names().join(", "), "available tools");

    let prompts: Vec<(Option<&str>, String)> = if args.prompt.is_empty() {
        DEMO_PROMPTS
            .iter()
            .map(|(title, prompt)| (Some(*title), prompt.to_string()))
            .collect()
    } else {
        vec![(None, args.prompt.join(" "))]
    };

    let mut failed = false;
    for (title, prompt) in prompts {
        if let Some(title) = title {
            display_section(title);
        }

        match dispatcher.run(&prompt).await {
            Ok(outcome) => render_outcome(&outcome),
            Err(e) => {
                display_error(&e.to_string());
                failed = true;
            }
        }
    }

    if failed {
        process::exit(1);
    }
}

fn init_config_file(args: &Args) -> anyhow::Result<String> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => FileConfig::user_config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?,
    };
    FileConfig::write_example(&path)?;
    Ok(path.display().to_string())
}

fn render_outcome(outcome: &DispatchOutcome) {
    for tool_outcome in &outcome.tool_outcomes {
        display_tool_call(&tool_outcome.name);
        match &tool_outcome.result {
            Ok(text) => display_tool_result(&tool_outcome.name, text),
            Err(e) => display_tool_error(&tool_outcome.name, &e.to_string()),
        }
    }

    match &outcome.content {
        Some(content) => display_content(content),
        None if !outcome.has_tool_calls() => display_no_output(),
        None => {}
    }
}
