//! One-shot messages carried across a redirect in a cookie, and the page
//! envelope that hands them to the next view.

use actix_web::cookie::Cookie;
use actix_web::http::{StatusCode, header};
use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use futures::future::{Ready, ready};
use serde::Serialize;

pub const FLASH_COOKIE: &str = "leave_flash";

/// Messages queued by the previous response. Extracting never fails.
#[derive(Debug, Default)]
pub struct Flash(pub Vec<String>);

impl FromRequest for Flash {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let messages = req
            .cookie(FLASH_COOKIE)
            .map(|c| decode(c.value()))
            .unwrap_or_default();
        ready(Ok(Flash(messages)))
    }
}

fn encode(messages: &[String]) -> String {
    // serializing a list of strings cannot fail
    let json = serde_json::to_vec(messages).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

fn decode(value: &str) -> Vec<String> {
    URL_SAFE_NO_PAD
        .decode(value)
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .unwrap_or_default()
}

fn flash_cookie(messages: &[String]) -> Cookie<'static> {
    Cookie::build(FLASH_COOKIE, encode(messages))
        .path("/")
        .http_only(true)
        .finish()
}

fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new(FLASH_COOKIE, "");
    cookie.set_path("/");
    cookie.make_removal();
    cookie
}

/// Every page view is wrapped in this envelope.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub flash: Vec<String>,
    #[serde(flatten)]
    pub view: T,
}

/// Renders `view`, consuming the pending flash messages.
pub fn render<T: Serialize>(status: StatusCode, flash: Flash, view: T) -> HttpResponse {
    let mut builder = HttpResponse::build(status);
    if !flash.0.is_empty() {
        builder.cookie(removal_cookie());
    }
    builder.json(Page {
        flash: flash.0,
        view,
    })
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// 303 to `location`, queuing `message` for the next page view.
pub fn redirect_with(location: &str, message: impl Into<String>) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .cookie(flash_cookie(&[message.into()]))
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn cookie_value_is_cookie_safe() {
        let value = encode(&["Leave request for john_doe has been approved.".to_string()]);
        assert!(
            value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
        assert_eq!(decode(&value), vec!["Leave request for john_doe has been approved."]);
    }

    #[test]
    fn garbage_cookie_means_no_messages() {
        assert!(decode("%%%not-base64").is_empty());
        assert!(decode(&URL_SAFE_NO_PAD.encode(b"{\"not\":\"a list\"}")).is_empty());
    }

    #[actix_web::test]
    async fn extractor_reads_the_flash_cookie() {
        let req = TestRequest::default()
            .cookie(flash_cookie(&["hello".to_string()]))
            .to_http_request();
        let flash = Flash::extract(&req).await.unwrap();
        assert_eq!(flash.0, vec!["hello"]);

        let empty = Flash::extract(&TestRequest::default().to_http_request())
            .await
            .unwrap();
        assert!(empty.0.is_empty());
    }

    #[test]
    fn redirect_with_sets_location_and_cookie() {
        let resp = redirect_with("/my_requests", "Your leave request has been submitted!");
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/my_requests");
        assert!(resp.cookies().any(|c| c.name() == FLASH_COOKIE));
    }

    #[test]
    fn rendering_clears_consumed_messages() {
        let resp = render(StatusCode::OK, Flash(vec!["bye".into()]), serde_json::json!({}));
        let cleared = resp.cookies().find(|c| c.name() == FLASH_COOKIE).unwrap();
        assert_eq!(cleared.value(), "");

        let quiet = render(StatusCode::OK, Flash::default(), serde_json::json!({}));
        assert_eq!(quiet.cookies().count(), 0);
    }
}
