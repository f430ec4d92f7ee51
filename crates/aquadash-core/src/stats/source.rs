use std::future::Future;
use std::pin::Pin;

use super::types::{DisplayDocument, StatusDocument};
use crate::error::FetchError;

/// A place status documents come from.
pub trait StatsSource: Send + Sync + 'static {
    /// Fetch one status document.
    fn fetch(&self) -> Pin<Box<dyn Future<Output = Result<StatusDocument, FetchError>> + Send + '_>>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

/// Turn an HTTP status code and body into a status document.
///
/// Any non-2xx status is a failure regardless of the body.
pub fn decode_response(status: u16, body: &[u8]) -> Result<StatusDocument, FetchError> {
    if !(200..300).contains(&status) {
        return Err(FetchError::Status(status));
    }
    StatusDocument::decode(body)
}

/// Fetch one document and prepare it for display.
pub async fn fetch_and_transform<S>(source: &S) -> Result<DisplayDocument, FetchError>
where
    S: StatsSource + ?Sized,
{
    let doc = source.fetch().await?;
    Ok(doc.into_display())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_response_ok() {
        let doc = decode_response(200, br#"{"height": 1, "now": 2}"#).unwrap();
        assert_eq!(doc.height, 1);
        assert_eq!(doc.now, 2);
    }

    #[test]
    fn test_decode_response_status() {
        let body = br#"{"height": 1, "now": 2}"#;
        assert_eq!(decode_response(503, body), Err(FetchError::Status(503)));
        assert_eq!(decode_response(304, body), Err(FetchError::Status(304)));
    }

    #[test]
    fn test_decode_response_bad_body() {
        assert!(matches!(
            decode_response(200, b"<html>"),
            Err(FetchError::Decode(_))
        ));
    }

    struct FixedSource(&'static [u8]);

    impl StatsSource for FixedSource {
        fn fetch(
            &self,
        ) -> Pin<Box<dyn Future<Output = Result<StatusDocument, FetchError>> + Send + '_>> {
            Box::pin(async move { decode_response(200, self.0) })
        }

        fn describe(&self) -> String {
            "fixed".to_string()
        }
    }

    #[test]
    fn test_fetch_and_transform_derives_next_epoch() {
        let source = FixedSource(br#"{"height": 29999, "now": 0, "miners": null}"#);
        let display = tokio_test::block_on(fetch_and_transform(&source)).unwrap();
        assert_eq!(display.next_epoch, 14_400);
        assert!(display.status.miners.is_none());
    }

    #[test]
    fn test_fetch_and_transform_through_trait_object() {
        let source: Box<dyn StatsSource> = Box::new(FixedSource(b"[]"));
        let result = tokio_test::block_on(fetch_and_transform(source.as_ref()));
        assert!(matches!(result, Err(FetchError::Decode(_))));
    }
}
