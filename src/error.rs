use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("not on the menu: {0}")]
    UnknownItem(String),

    #[error("cart is empty")]
    EmptyCart,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("invalid email address")]
    InvalidEmail,
}
