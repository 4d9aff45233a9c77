//! Wire types for the PIN code lookup service and the resolved location.
//!
//! The upstream answers `GET /pincode/{pin}` with a JSON array holding one
//! envelope:
//!
//! ```json
//! [{"Message": "Number of pincode(s) found:21", "Status": "Success",
//!   "PostOffice": [{"Name": "Connaught Place", "District": "Central Delhi",
//!                   "State": "Delhi", ...}]}]
//! ```
//!
//! Unknown PIN codes come back as `"Status": "Error"` with a null
//! `PostOffice`.

use serde::{Deserialize, Serialize};

/// One envelope of the upstream response array. `Message` is informational
/// and not read.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PincodeEnvelope {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub post_office: Option<Vec<PostOffice>>,
}

impl PincodeEnvelope {
    /// Status value the upstream uses for a hit.
    pub const SUCCESS: &'static str = "Success";

    /// First post office of a successful envelope.
    pub fn first_post_office(&self) -> Option<&PostOffice> {
        if self.status != Self::SUCCESS {
            return None;
        }
        self.post_office.as_deref().and_then(<[PostOffice]>::first)
    }
}

/// A post office record. Only the fields the resolver reads are typed;
/// everything else the upstream sends is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PostOffice {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

/// City, state and area for a PIN code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationResult {
    pub city: String,
    pub state: String,
    pub area: String,
    pub pincode: String,
}

impl LocationResult {
    /// Map a post office to a location: District is the city, Name is the
    /// area. Returns `None` if city or state is missing or blank.
    pub fn from_post_office(pincode: &str, office: &PostOffice) -> Option<Self> {
        let text = |v: &Option<String>| v.as_deref().map(str::trim).unwrap_or_default().to_string();
        let city = text(&office.district);
        let state = text(&office.state);
        if city.is_empty() || state.is_empty() {
            return None;
        }
        Some(Self {
            city,
            state,
            area: text(&office.name),
            pincode: pincode.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_maps_first_post_office() {
        let json = r#"[{"Message":"Number of pincode(s) found:2","Status":"Success",
            "PostOffice":[
              {"Name":"Connaught Place","Description":null,"BranchType":"Sub Post Office",
               "District":"Central Delhi","State":"Delhi","Country":"India"},
              {"Name":"Janpath","District":"New Delhi","State":"Delhi"}]}]"#;
        let envelopes: Vec<PincodeEnvelope> = serde_json::from_str(json).unwrap();
        let office = envelopes[0].first_post_office().unwrap();
        let location = LocationResult::from_post_office("110001", office).unwrap();
        assert_eq!(
            location,
            LocationResult {
                city: "Central Delhi".into(),
                state: "Delhi".into(),
                area: "Connaught Place".into(),
                pincode: "110001".into(),
            }
        );
    }

    #[test]
    fn error_envelope_has_no_post_office() {
        let json = r#"[{"Message":"No records found","Status":"Error","PostOffice":null}]"#;
        let envelopes: Vec<PincodeEnvelope> = serde_json::from_str(json).unwrap();
        assert!(envelopes[0].first_post_office().is_none());
    }

    #[test]
    fn success_with_empty_list_has_no_post_office() {
        let json = r#"[{"Status":"Success","PostOffice":[]}]"#;
        let envelopes: Vec<PincodeEnvelope> = serde_json::from_str(json).unwrap();
        assert!(envelopes[0].first_post_office().is_none());
    }

    #[test]
    fn blank_district_is_not_a_location() {
        let office = PostOffice {
            name: Some("Somewhere".into()),
            district: Some("  ".into()),
            state: Some("Delhi".into()),
            ..PostOffice::default()
        };
        assert!(LocationResult::from_post_office("110001", &office).is_none());
    }

    #[test]
    fn missing_name_gives_empty_area() {
        let office = PostOffice {
            district: Some("Mumbai".into()),
            state: Some("Maharashtra".into()),
            ..PostOffice::default()
        };
        let location = LocationResult::from_post_office("400001", &office).unwrap();
        assert_eq!(location.area, "");
    }

    #[test]
    fn untyped_upstream_keys_are_ignored() {
        let json = r#"[{"Message":"Number of pincode(s) found:1","Status":"Success",
            "PostOffice":[{"Name":"Fort","Block":"Mumbai","Country":"India","Pincode":"400001",
               "District":"Mumbai","State":"Maharashtra"}]}]"#;
        let envelopes: Vec<PincodeEnvelope> = serde_json::from_str(json).unwrap();
        let office = envelopes[0].first_post_office().unwrap();
        assert_eq!(office.name.as_deref(), Some("Fort"));
        assert_eq!(office.district.as_deref(), Some("Mumbai"));
    }
}
