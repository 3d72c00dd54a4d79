use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{error, warn};

use crate::{chat, event, group, message, molecule, user};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    _Chat(#[from] chat::Error),
    #[error(transparent)]
    _Group(#[from] group::Error),
    #[error(transparent)]
    _Message(#[from] message::Error),
    #[error(transparent)]
    _Event(#[from] event::Error),
    #[error(transparent)]
    _User(#[from] user::Error),
    #[error(transparent)]
    _Molecule(#[from] molecule::Error),
}

impl From<&Error> for StatusCode {
    fn from(e: &Error) -> Self {
        match e {
            Error::_Chat(chat::Error::MissingName) => Self::BAD_REQUEST,
            Error::_Chat(chat::Error::AlreadyExists(_)) => Self::CONFLICT,
            Error::_Group(group::Error::NotFound(_)) => Self::NOT_FOUND,
            Error::_Group(group::Error::EmptyName) | Error::_Message(message::Error::EmptyText) => {
                Self::BAD_REQUEST
            }
            Error::_User(e) => e.into(),
            Error::_Molecule(e) => e.into(),
            Error::_Chat(_) | Error::_Group(_) | Error::_Message(_) | Error::_Event(_) => {
                Self::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = StatusCode::from(&self);

        let message = if status.is_server_error() {
            error!("{self}");
            "Internal server error".to_owned()
        } else {
            warn!("{self}");
            self.to_string()
        };

        (status, message).into_response()
    }
}
