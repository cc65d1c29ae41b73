pub mod extract;
pub mod list;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Extract every resource of an rpack file into a directory
    Extract(extract::ExtractArgs),
    /// List the resources of an rpack file
    List(list::ListArgs),
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Extract(extract) => extract.handle(),
            Commands::List(list) => list.handle(),
        }
    }
}
