//! skelinit's main application entry point.
//! Parses the command line, wires the real collaborators together and runs
//! the initialization pipeline.

use skelinit::{
    cli::{get_args, Args},
    collector::InputFlags,
    config::load_skeleton,
    error::{default_error_handler, Result},
    license::{GithubLicenseSource, LicenseSource, OfflineLicenseSource},
    orchestrator::{current_year, initialize, Collaborators, EntryPointRemover},
    prompt::DialoguerPrompter,
    renderer::MiniJinjaRenderer,
    toolchain::CommandToolchain,
};

/// Main application entry point.
fn main() {
    let args = get_args();

    // Logger configuration
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Trace
        } else {
            log::LevelFilter::Warn
        })
        .init();

    match run(args) {
        Ok(code) => std::process::exit(code),
        Err(err) => default_error_handler(err),
    }
}

/// Main application logic execution.
///
/// # Returns
/// * `Result<i32>` - process exit status, non-zero when the report has warnings
fn run(args: Args) -> Result<i32> {
    let skeleton = load_skeleton(&args.root)?;

    let prompter = DialoguerPrompter::new();
    let licenses: Box<dyn LicenseSource> = if args.offline {
        Box::new(OfflineLicenseSource)
    } else {
        Box::new(GithubLicenseSource::new()?)
    };
    let toolchain = CommandToolchain::new(skeleton.lock_command.clone(), skeleton.import_command.clone());
    let renderer = MiniJinjaRenderer::new();

    let collaborators = Collaborators {
        prompter: &prompter,
        licenses: &*licenses,
        toolchain: &toolchain,
        renderer: &renderer,
        self_remover: &EntryPointRemover,
    };

    let flags = InputFlags::from(&args);
    let summary = initialize(&args.root, skeleton, &flags, &collaborators, current_year())?;
    Ok(summary.exit_code())
}
