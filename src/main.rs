use clap::Parser;
use promptmaker::cli::{
    handle_add, handle_apply, handle_example, handle_export, handle_improve, handle_load,
    handle_remove, handle_reset, handle_schema, handle_serve, handle_set, handle_share,
    handle_show, handle_templates, Cli, Commands,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_env("PROMPTMAKER_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let state_dir = cli.state_dir;

    let result = match cli.command {
        Commands::Show { token, file, json } => handle_show(state_dir, token, file, json),
        Commands::Share {
            base_url,
            token_only,
        } => handle_share(state_dir, base_url, token_only),
        Commands::Load { token } => handle_load(state_dir, token),
        Commands::Reset => handle_reset(state_dir),
        Commands::Set { field, value } => handle_set(state_dir, field, value),
        Commands::Add { field, item } => handle_add(state_dir, field, item),
        Commands::Remove { field, item } => handle_remove(state_dir, field, item),
        Commands::Example(example_cmd) => handle_example(state_dir, example_cmd.action),
        Commands::Templates { json } => handle_templates(json),
        Commands::Apply { id } => handle_apply(state_dir, id),
        Commands::Improve { endpoint, dry_run } => handle_improve(state_dir, endpoint, dry_run),
        Commands::Export { output } => handle_export(state_dir, output),
        Commands::Schema => handle_schema(),
        Commands::Serve { addr } => handle_serve(addr),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
