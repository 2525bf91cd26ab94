//! General Discord commands - ping and help.
//! These need no database access.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{bot::Context, errors::Result};

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: Context<'_>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: Context<'_>) -> Result<()> {
        let help_text = "**BudgieBuddy Help**\n\
        Keep track of your birds, their pedigree and your breeding rounds.\n\n\
        **Birds**\n\
        • `/bird add <ring> [gender] [color] [born] [breeder] [owner]` - Registers a bird.\n\
        • `/bird info|parents|colors|died|delete <ring>` - Shows or changes a bird; `parents` keeps a parent you leave out unless you clear it.\n\
        • `/bird owned|for_sale <rings>` - Flags several birds at once.\n\
        • `/bird list` - Lists your birds.\n\
        • `/pedigree <ring> [generations]` - Shows ancestors and common ancestors.\n\n\
        **Catalog**\n\
        • `/breeder add|edit|delete|list` - Manages breeders and owners.\n\
        • `/color_property add|rank|delete|list` - Manages color properties.\n\n\
        **Breeding**\n\
        • `/season add|list` - Manages breeding seasons.\n\
        • `/couple add|list` - Puts couples together per season.\n\
        • `/eggs add <couples> <status>` - Adds an egg to several couples.\n\
        • `/eggs list|status` - Follows eggs and expected hatch dates.\n\
        • `/location add|assign|list` - Tracks where couples are housed.\n\n\
        **Import and export**\n\
        • `/import <file>` - Imports birds from a .csv or .xlsx spreadsheet.\n\
        • `/export <what>` - Downloads your records as CSV.\n\n\
        **Utility Commands**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
