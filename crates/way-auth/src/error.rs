use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(
        "client credentials missing — set WAYPOST_OAUTH__CLIENT_ID and WAYPOST_OAUTH__CLIENT_SECRET"
    )]
    MissingClientCredentials,

    #[error("127.0.0.1:{0} is already in use — another `wpt auth login` may be running")]
    ListenerBind(u16),

    #[error("provider rejected the authorization: {0}")]
    Provider(String),

    #[error("callback carried neither a code nor an error")]
    MissingCode,

    #[error("no callback within {0}s — authorization timed out")]
    FlowTimeout(u64),

    #[error("credential store write failed: {0}")]
    StorageWrite(String),

    #[error("credential store is corrupt: {0}")]
    StorageCorrupt(String),

    #[error("not authenticated — run `wpt auth login` first")]
    NotAuthenticated,

    #[error("{0}")]
    Other(String),
}
