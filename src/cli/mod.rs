mod commands;
mod handlers;

pub use commands::{Cli, Commands, ExampleAction, ExampleCommand};
pub use handlers::{
    handle_add, handle_apply, handle_example, handle_export, handle_improve, handle_load,
    handle_remove, handle_reset, handle_schema, handle_serve, handle_set, handle_share,
    handle_show, handle_templates,
};
