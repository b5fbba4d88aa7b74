//! Cloud Vision annotation payloads.
//!
//! Field names follow the JSON of `images:annotate`; every list defaults to
//! empty so a response without findings deserializes cleanly.

use serde::{Deserialize, Serialize};

/// Annotation feature requested from the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Feature {
    /// Objects and concepts.
    LabelDetection,
    /// OCR over the whole image.
    TextDetection,
    /// Matches and similar images on the web.
    WebDetection,
    /// Well-known places.
    LandmarkDetection,
}

/// One per-image response from the annotation service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageAnnotation {
    /// Filled for label detection.
    pub label_annotations: Vec<EntityAnnotation>,
    /// The first entry holds the full text, the rest single fragments.
    pub text_annotations: Vec<EntityAnnotation>,
    /// Filled for landmark detection.
    pub landmark_annotations: Vec<EntityAnnotation>,
    /// Filled for web detection.
    pub web_detection: Option<WebDetection>,
    /// Set when the service failed on this image.
    pub error: Option<RemoteStatus>,
}

/// Label, text fragment or landmark.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntityAnnotation {
    /// Knowledge graph id.
    pub mid: String,
    /// Label name, text fragment or landmark name.
    pub description: String,
    /// Confidence in [0, 1]. Zero for text fragments.
    pub score: f32,
    /// Only filled for landmarks.
    pub locations: Vec<LocationInfo>,
}

/// Where a landmark is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationInfo {
    /// Landmark position.
    pub lat_lng: LatLng,
}

/// WGS84 coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatLng {
    /// Degrees north.
    pub latitude: f64,
    /// Degrees east.
    pub longitude: f64,
}

/// Error object embedded in an otherwise successful response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteStatus {
    /// gRPC status code.
    pub code: i32,
    /// Description from the service.
    pub message: String,
}

/// Web detection findings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebDetection {
    /// Entities inferred from matching pages.
    pub web_entities: Vec<WebEntity>,
    /// Exact copies of the image.
    pub full_matching_images: Vec<WebImage>,
    /// Crops or edits of the image.
    pub partial_matching_images: Vec<WebImage>,
    /// Pages containing a full or partial match.
    pub pages_with_matching_images: Vec<WebPage>,
    /// Images that merely look alike.
    pub visually_similar_images: Vec<WebImage>,
    /// Guesses for the image topic.
    pub best_guess_labels: Vec<WebLabel>,
}

/// Entity inferred from similar images on the web.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebEntity {
    /// Knowledge graph id.
    pub entity_id: String,
    /// Relevance, not normalised.
    pub score: f32,
    /// Entity name.
    pub description: String,
}

/// Image found on the web.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebImage {
    /// Image location.
    pub url: String,
}

/// Page containing a matching image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebPage {
    /// Page location.
    pub url: String,
    /// Title of the page, may contain markup.
    pub page_title: String,
    /// Exact copies on this page.
    pub full_matching_images: Vec<WebImage>,
    /// Crops or edits on this page.
    pub partial_matching_images: Vec<WebImage>,
}

/// Best guess for the image topic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebLabel {
    /// Topic guess.
    pub label: String,
    /// BCP-47 language of `label`.
    pub language_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_landmark_response() {
        let json = serde_json::json!({
            "landmarkAnnotations": [{
                "mid": "/m/02j81",
                "description": "Eiffel Tower",
                "score": 0.91,
                "locations": [{"latLng": {"latitude": 48.858, "longitude": 2.294}}]
            }]
        });
        let annotation: ImageAnnotation = serde_json::from_value(json).unwrap();
        let landmark = &annotation.landmark_annotations[0];
        assert_eq!(landmark.description, "Eiffel Tower");
        assert!((landmark.locations[0].lat_lng.longitude - 2.294).abs() < 1e-9);
        assert!(annotation.error.is_none());
    }

    #[test]
    fn test_empty_response_has_no_findings() {
        let annotation: ImageAnnotation = serde_json::from_str("{}").unwrap();
        assert!(annotation.label_annotations.is_empty());
        assert!(annotation.web_detection.is_none());
    }

    #[test]
    fn test_feature_wire_name() {
        assert_eq!(
            serde_json::to_value(Feature::LandmarkDetection).unwrap(),
            serde_json::json!("LANDMARK_DETECTION")
        );
    }
}
