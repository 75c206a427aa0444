use serde::de::DeserializeOwned;

use crate::error::CatalogError;

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, CatalogError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(with_path)
}

pub fn from_slice_with_path<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CatalogError> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize::<_, T>(de).map_err(with_path)
}

fn with_path(err: serde_path_to_error::Error<serde_json::Error>) -> CatalogError {
    let path = err.path().to_string();
    CatalogError::Json { path, message: err.into_inner().to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Outer {
        #[allow(dead_code)]
        inner: Vec<Inner>,
    }

    #[derive(Debug, Deserialize)]
    struct Inner {
        #[allow(dead_code)]
        count: u32,
    }

    #[test]
    fn error_names_the_failing_path() {
        let err = from_str_with_path::<Outer>(r#"{ "inner": [ { "count": 1 }, { "count": "x" } ] }"#)
            .unwrap_err();
        match err {
            CatalogError::Json { path, .. } => assert_eq!(path, "inner[1].count"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(from_slice_with_path::<Outer>(br#"{ "inner": [] }"#).is_ok());
    }
}
