use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("no realm available: the discovery round produced no candidates")]
    NoCandidates,

    #[error("no realm available: none of {candidates} candidates is reachable with free capacity")]
    NoRealmAvailable { candidates: usize },

    #[error("realm {0} not found among current candidates")]
    UnknownRealm(String),

    #[error("realm {0} is full")]
    RealmFull(String),

    #[error("realm {0} is unreachable")]
    Unreachable(String),
}
