//! User-facing text for failures and screen labels

use crate::model::Reason;

/// Keys of the built-in string table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StringId {
    ErrorNoInternet,
    ErrorTimeout,
    ErrorNotFound,
    ErrorUnauthorized,
    ErrorForbidden,
    ErrorServer,
    ErrorUnknown,
    ArtistsNotFound,
    ReleasesNotFound,
    AlbumsNotFound,
    LoadMoreFailed,
    LoadingMore,
    SearchPrompt,
}

/// String lookup, injected so message mapping can be tested without a UI.
pub trait TextResourceProvider: Send + Sync {
    /// Text for `id` with `{0}`, `{1}`, ... replaced by `args`
    fn get_string(&self, id: StringId, args: &[&str]) -> String;

    /// Text the caller already has; a localizing provider may translate it.
    fn get_literal(&self, value: &str) -> String {
        value.to_string()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct EnglishText;

impl EnglishText {
    fn template(id: StringId) -> &'static str {
        match id {
            StringId::ErrorNoInternet => "No internet connection. Please try again",
            StringId::ErrorTimeout => "Taking too long. Try again",
            StringId::ErrorNotFound => "Not found",
            StringId::ErrorUnauthorized => "Unauthorized. Check your Discogs token",
            StringId::ErrorForbidden => "Access to this resource is forbidden",
            StringId::ErrorServer => "Discogs is having trouble. Try again later",
            StringId::ErrorUnknown => "Something went wrong",
            StringId::ArtistsNotFound => "Artists not found",
            StringId::ReleasesNotFound => "Releases not found",
            StringId::AlbumsNotFound => "No albums found",
            StringId::LoadMoreFailed => "Could not load more: {0}",
            StringId::LoadingMore => "Loading more...",
            StringId::SearchPrompt => "Type an artist name to search",
        }
    }
}

impl TextResourceProvider for EnglishText {
    fn get_string(&self, id: StringId, args: &[&str]) -> String {
        args.iter()
            .enumerate()
            .fold(Self::template(id).to_string(), |text, (i, arg)| {
                text.replace(&format!("{{{i}}}"), arg)
            })
    }
}

impl Reason {
    pub fn to_ui_message(&self, text: &dyn TextResourceProvider) -> String {
        let id = match self {
            Reason::NoInternet => StringId::ErrorNoInternet,
            Reason::Timeout => StringId::ErrorTimeout,
            Reason::NotFound => StringId::ErrorNotFound,
            Reason::Unauthorized => StringId::ErrorUnauthorized,
            Reason::Forbidden => StringId::ErrorForbidden,
            Reason::InternalServerError => StringId::ErrorServer,
            Reason::Unknown(_) => StringId::ErrorUnknown,
        };
        text.get_string(id, &[])
    }
}
