use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::{self, AppContext};

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Predict(args) => {
            context::warn_unconfigured(&ctx.config);
            commands::predict::handle(&args, ctx, flags).await
        }
        Commands::Update(args) => {
            context::warn_unconfigured(&ctx.config);
            commands::update::handle(&args, ctx, flags).await
        }
        Commands::Compare(args) => {
            context::warn_unconfigured(&ctx.config);
            commands::compare::handle(&args, ctx, flags).await
        }
        Commands::Report(args) => commands::report::handle(&args, ctx, flags),
    }
}
