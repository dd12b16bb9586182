use serde::Serialize;

/// Classification result with the label's static metadata and the URL where
/// the stored upload is served back.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub result: &'static str,
    pub definition: &'static str,
    pub color: &'static str,
    pub healthy: bool,
    pub image_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_shape() {
        let response = PredictResponse {
            result: "Tomato_Healthy",
            definition: "Healthy tomato leaf.",
            color: "green",
            healthy: true,
            image_url: "/static/uploads/leaf.jpg".into(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["result"], "Tomato_Healthy");
        assert_eq!(json["healthy"], true);
        assert_eq!(json["image_url"], "/static/uploads/leaf.jpg");
    }
}
