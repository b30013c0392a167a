use colored::*;

/// Section header, e.g. `=== Multiply Tool Usage ===`.
pub fn display_section(title: &str) {
    println!("\n{}", format!("=== {} ===", title).bold());
}

pub fn display_tool_call(name: &str) {
    println!("{}", format!("Calling tool: {}...", name).cyan());
}

/// Display a tool result in a labelled block
pub fn display_tool_result(name: &str, result: &str) {
    println!("{}", format!("┌─[TOOL: {}]", name).dimmed());
    println!("{}", result.trim_end());
    println!("{}", "└──".dimmed());
}

/// Display a tool error in a labelled block
pub fn display_tool_error(name: &str, error: &str) {
    println!("{}", format!("┌─[TOOL ERROR: {}]", name).red());
    println!("{}", error.trim_end().red());
    println!("{}", "└──".red());
}

/// Display model text when no tool was called
pub fn display_content(content: &str) {
    println!("{}", content.trim_end());
}

pub fn display_no_output() {
    println!("{}", "The model returned no tool calls and no text.".yellow());
}

pub fn display_error(message: &str) {
    eprintln!("{} {}", "Error:".red(), message);
}

pub fn display_warning(message: &str) {
    eprintln!("{} {}", "Warning:".yellow(), message);
}
