use serde::{Deserialize, Serialize};
use url::Url;
use validator::Validate;

const WEB_SCHEMES: [&str; 3] = ["http", "https", "ftp"];

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Bookmark {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub description: String,
    pub rating: i32,
}

/// Every field a stored bookmark carries except its id.
///
/// The validation attributes are the one constraint table shared by creation
/// and partial update, so a bookmark is checked the same way on both paths.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NewBookmark {
    #[validate(length(min = 1, message = "title required"))]
    pub title: String,
    #[validate(custom(function = "validate_web_url"))]
    pub url: String,
    pub description: String,
    #[validate(range(min = 1, max = 5, message = "rating must be a number between 1 and 5"))]
    pub rating: i32,
}

impl NewBookmark {
    pub fn into_bookmark(self, id: i64) -> Bookmark {
        Bookmark {
            id,
            title: self.title,
            url: self.url,
            description: self.description,
            rating: self.rating,
        }
    }
}

impl From<&Bookmark> for NewBookmark {
    fn from(bookmark: &Bookmark) -> Self {
        Self {
            title: bookmark.title.clone(),
            url: bookmark.url.clone(),
            description: bookmark.description.clone(),
            rating: bookmark.rating,
        }
    }
}

/// Bookmark fields exactly as a client sent them. Used both as a creation
/// candidate and as a patch; absent and `null` fields are both `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BookmarkDraft {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub rating: Option<RatingValue>,
}

impl BookmarkDraft {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.url.is_none()
            && self.description.is_none()
            && self.rating.is_none()
    }
}

/// Clients send ratings either as JSON numbers or as numeric strings. Any
/// other JSON value is kept so it fails as a rating, not as a body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RatingValue {
    Number(serde_json::Number),
    Text(String),
    Other(serde_json::Value),
}

impl RatingValue {
    /// Integer value of the rating, if it has one. Strings are trimmed and
    /// an empty string counts as zero; fractional values have no integer value.
    pub fn to_integer(&self) -> Option<i32> {
        match self {
            RatingValue::Number(number) => match number.as_i64() {
                Some(value) => i32::try_from(value).ok(),
                None => number.as_f64().and_then(integral),
            },
            RatingValue::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return Some(0);
                }
                text.parse::<f64>().ok().and_then(integral)
            }
            RatingValue::Other(_) => None,
        }
    }
}

fn integral(value: f64) -> Option<i32> {
    let in_range = value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX);
    (value.fract() == 0.0 && in_range).then_some(value as i32)
}

fn validate_web_url(value: &str) -> Result<(), validator::ValidationError> {
    let valid = Url::parse(value).is_ok_and(|url| {
        WEB_SCHEMES.contains(&url.scheme()) && url.host_str().is_some_and(|host| !host.is_empty())
    });

    if valid {
        Ok(())
    } else {
        Err(validator::ValidationError::new("url"))
    }
}
