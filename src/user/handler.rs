use axum::http::StatusCode;

impl From<&super::Error> for StatusCode {
    fn from(e: &super::Error) -> Self {
        match e {
            super::Error::NotFound(_) => Self::NOT_FOUND,
            super::Error::Unauthorized => Self::UNAUTHORIZED,
            super::Error::EmptyUpdate
            | super::Error::InvalidAvatar(_)
            | super::Error::_Image(_)
            | super::Error::_Base64(_) => Self::BAD_REQUEST,
            super::Error::_R2d2(_) | super::Error::_Diesel(_) => Self::INTERNAL_SERVER_ERROR,
        }
    }
}

pub(super) mod pages {
    use axum::Extension;

    use crate::markup::Wrappable;
    use crate::user::{markup, model::Profile};

    pub async fn settings(profile: Extension<Profile>) -> Wrappable {
        Wrappable::new(markup::Settings(&profile))
    }
}

pub(super) mod api {
    use axum::{Extension, Form, extract::State};
    use maud::{Markup, Render};
    use serde::Deserialize;

    use crate::user::{self, avatar, markup, model::Profile, model::ProfileUpdate};

    #[derive(Deserialize)]
    pub struct UpdateParams {
        first_name: Option<String>,
        last_name: Option<String>,
        photo: Option<String>,
    }

    pub async fn update_profile(
        profile: Extension<Profile>,
        user_service: State<user::Service>,
        Form(params): Form<UpdateParams>,
    ) -> crate::Result<Markup> {
        if let Some(photo) = params.photo.as_deref().filter(|p| !p.is_empty()) {
            // reject photos that cannot be turned into a chat thumbnail
            avatar::thumbnail(photo)?;
        }

        let update = ProfileUpdate::new(params.first_name, params.last_name, params.photo);
        let updated = user_service.update_profile(profile.id(), &update).await?;

        Ok(markup::SettingsForm::saved(&updated).render())
    }
}
