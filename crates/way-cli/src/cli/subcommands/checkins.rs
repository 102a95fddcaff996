use clap::Args;

#[derive(Clone, Debug, Args)]
pub struct CheckinsArgs {
    /// Check-ins to fetch (defaults to the configured page size).
    #[arg(short, long)]
    pub limit: Option<u32>,

    /// Offset into the history, for paging.
    #[arg(long, default_value_t = 0)]
    pub offset: u32,
}
