use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetType {
    Economic,
    #[default]
    Medium,
    Premium,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
    pub budget: BudgetType,
    pub travelers: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub id: String,
    pub name: String,
    pub rating: f32,
    pub price: f64,
    pub image: String,
    pub location: String,
    #[serde(default)]
    pub amenities: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub cuisine: String,
    pub rating: f32,
    pub price_range: String,
    pub image: String,
    pub location: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attraction {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub rating: f32,
    pub price: f64,
    pub image: String,
    pub location: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayItinerary {
    pub day: u32,
    pub date: String,
    #[serde(default)]
    pub activities: Vec<Attraction>,
    #[serde(default)]
    pub restaurants: Vec<Restaurant>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripItinerary {
    pub id: String,
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
    pub budget: BudgetType,
    #[serde(default)]
    pub hotels: Vec<Hotel>,
    #[serde(default)]
    pub daily_itinerary: Vec<DayItinerary>,
    pub total_cost: f64,
}

/// Envelope every backend endpoint answers with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("response carried no data")]
    MissingData,
}

impl<T> ApiResponse<T> {
    pub fn into_result(self) -> Result<T, ApiError> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err(ApiError::MissingData),
            (false, _) => Err(ApiError::Rejected(
                self.message
                    .unwrap_or_else(|| "request failed".to_string()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn itinerary_payload_uses_camel_case_fields() {
        let payload = r#"{
            "success": true,
            "data": {
                "id": "trip-1",
                "destination": "Lisboa",
                "startDate": "2026-11-02",
                "endDate": "2026-11-05",
                "budget": "premium",
                "hotels": [{
                    "id": "h1",
                    "name": "Tejo",
                    "rating": 4.5,
                    "price": 320.0,
                    "image": "tejo.jpg",
                    "location": "Baixa"
                }],
                "dailyItinerary": [{
                    "day": 1,
                    "date": "2026-11-02",
                    "activities": [{
                        "id": "a1",
                        "name": "Belém",
                        "type": "monument",
                        "rating": 4.8,
                        "price": 10.0,
                        "image": "belem.jpg",
                        "location": "Belém",
                        "description": "Tower walk"
                    }],
                    "restaurants": []
                }],
                "totalCost": 1480.5
            }
        }"#;

        let response: ApiResponse<TripItinerary> =
            serde_json::from_str(payload).expect("payload parses");
        let trip = response.into_result().expect("successful response");
        assert_eq!(trip.budget, BudgetType::Premium);
        assert_eq!(trip.hotels[0].amenities, Vec::<String>::new());
        assert_eq!(trip.daily_itinerary[0].activities[0].kind, "monument");
        assert_eq!(trip.total_cost, 1480.5);
    }

    #[test]
    fn failed_response_surfaces_server_message() {
        let response: ApiResponse<User> =
            serde_json::from_str(r#"{"success": false, "message": "Invalid credentials"}"#)
                .expect("payload parses");
        assert_eq!(
            response.into_result(),
            Err(ApiError::Rejected("Invalid credentials".into()))
        );

        let empty: ApiResponse<User> =
            serde_json::from_str(r#"{"success": true}"#).expect("payload parses");
        assert_eq!(empty.into_result(), Err(ApiError::MissingData));
    }

    #[test]
    fn trip_request_serializes_for_backend() {
        let request = TripRequest {
            destination: "Recife".into(),
            start_date: "2026-12-20".into(),
            end_date: "2026-12-27".into(),
            budget: BudgetType::Economic,
            travelers: 2,
        };
        let json = serde_json::to_value(&request).expect("serializes");
        assert_eq!(json["startDate"], "2026-12-20");
        assert_eq!(json["budget"], "economic");
        assert_eq!(json["travelers"], 2);
    }
}
