mod output;

pub use output::{
    display_content, display_error, display_no_output, display_section, display_tool_call,
    display_tool_error, display_tool_result, display_warning,
};
