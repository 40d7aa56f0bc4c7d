pub mod commands;
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use commands::command_argument_builder;
pub use handlers::{
    OutputOptions, aws_source_from_args, emit_report, expand_path, handle_analyze,
    handle_discover, init_tracing, output_options,
};
