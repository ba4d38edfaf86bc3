use std::fmt;

/// Main error type for the battle engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleError {
    /// Error constructing a Pokemon or its parts
    Construction(ConstructionError),
    /// Error loading or looking up definition data
    Data(DataError),
    /// Error from an invalid battle action
    Action(ActionError),
}

/// Errors raised while constructing battle entities
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    /// A Pokemon must have exactly one or two types
    InvalidTypeCount(usize),
    /// A Pokemon can know at most four moves
    TooManyMoves(usize),
}

/// Errors related to definition data loading and lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    /// The specified species id was not found in the loaded data
    SpeciesNotFound(String),
    /// The specified move id was not found in the loaded data
    MoveNotFound(String),
    /// The specified item id was not found in the loaded data
    ItemNotFound(String),
    /// A type name in a data document did not match any known type
    UnknownType(String),
    /// A data document failed to parse
    MalformedData(String),
}

/// Errors related to battle actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// Move index is out of bounds for the acting Pokemon
    InvalidMoveIndex(usize),
    /// The battle has already been decided
    BattleOver,
}

impl fmt::Display for BattleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattleError::Construction(err) => write!(f, "Construction error: {}", err),
            BattleError::Data(err) => write!(f, "Data error: {}", err),
            BattleError::Action(err) => write!(f, "Action error: {}", err),
        }
    }
}

impl fmt::Display for ConstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstructionError::InvalidTypeCount(count) => {
                write!(f, "Pokemon must have 1-2 types, got {}", count)
            }
            ConstructionError::TooManyMoves(count) => {
                write!(f, "Pokemon can have at most 4 moves, got {}", count)
            }
        }
    }
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::SpeciesNotFound(id) => write!(f, "Species not found: {}", id),
            DataError::MoveNotFound(id) => write!(f, "Move not found: {}", id),
            DataError::ItemNotFound(id) => write!(f, "Item not found: {}", id),
            DataError::UnknownType(name) => write!(f, "Unknown type name: {}", name),
            DataError::MalformedData(details) => write!(f, "Malformed data: {}", details),
        }
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::InvalidMoveIndex(index) => write!(f, "Invalid move index: {}", index),
            ActionError::BattleOver => write!(f, "The battle is already over"),
        }
    }
}

impl std::error::Error for BattleError {}
impl std::error::Error for ConstructionError {}
impl std::error::Error for DataError {}
impl std::error::Error for ActionError {}

impl From<ConstructionError> for BattleError {
    fn from(err: ConstructionError) -> Self {
        BattleError::Construction(err)
    }
}

impl From<DataError> for BattleError {
    fn from(err: DataError) -> Self {
        BattleError::Data(err)
    }
}

impl From<ActionError> for BattleError {
    fn from(err: ActionError) -> Self {
        BattleError::Action(err)
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::MalformedData(err.to_string())
    }
}

impl From<ron::error::SpannedError> for DataError {
    fn from(err: ron::error::SpannedError) -> Self {
        DataError::MalformedData(err.to_string())
    }
}

/// Type alias for Results using BattleError
pub type BattleResult<T> = Result<T, BattleError>;

/// Type alias for Results using DataError
pub type DataResult<T> = Result<T, DataError>;
