//! Scraped record types
//!
//! One [`Location`] per group-header row, each holding the [`Opportunity`]
//! records assembled from the rows of its group. A [`Dataset`] is the ordered
//! concatenation of every page's locations.

use serde::{Deserialize, Serialize};

/// One training/apprenticeship offering tied to a company
///
/// Table fields are always present (possibly empty). Detail fields default to
/// the empty string and are only filled when the matching detail-list entry
/// was rendered on the page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub program_name: String,
    pub service: String,
    pub city: String,
    pub state: String,
    pub duration: String,
    #[serde(rename = "employerPOC")]
    pub employer_poc: String,
    pub poc_email: String,
    pub cost: String,
    pub delivery_method: String,

    #[serde(default)]
    pub closest_installation: String,
    #[serde(default)]
    pub opportunity_locations_by_state: String,
    #[serde(default, rename = "targetMOCs")]
    pub target_mocs: String,
    #[serde(default)]
    pub other_eligibility_factors: String,
    #[serde(default)]
    pub other_prerequisite: String,
    #[serde(default)]
    pub jobs_description: String,
    #[serde(default)]
    pub summary_description: String,
    #[serde(default)]
    pub job_family: String,
    #[serde(default)]
    pub mou_organization: String,

    /// Map pin coordinates from the row's first cell, when the page exposes them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

/// Detail fields reachable through the label/value list of a detail row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailField {
    ClosestInstallation,
    OpportunityLocationsByState,
    TargetMocs,
    OtherEligibilityFactors,
    OtherPrerequisite,
    JobsDescription,
    SummaryDescription,
    JobFamily,
    MouOrganization,
}

impl DetailField {
    /// Resolve a detail label. Matching is exact and case-sensitive.
    pub fn from_label(label: &str) -> Option<Self> {
        let field = match label {
            "Closest Installation" => Self::ClosestInstallation,
            "Opportunity Locations by State" => Self::OpportunityLocationsByState,
            "Target MOCs" => Self::TargetMocs,
            "Other Eligibility Factors" => Self::OtherEligibilityFactors,
            "Other/Prerequisite" => Self::OtherPrerequisite,
            "Jobs Description" => Self::JobsDescription,
            "Summary Description" => Self::SummaryDescription,
            "Job Family" => Self::JobFamily,
            "MOU Organization" => Self::MouOrganization,
            _ => return None,
        };
        Some(field)
    }
}

impl Opportunity {
    /// Overwrite one detail field. Applying the same field twice keeps the last value.
    pub fn set_detail(&mut self, field: DetailField, value: String) {
        let slot = match field {
            DetailField::ClosestInstallation => &mut self.closest_installation,
            DetailField::OpportunityLocationsByState => &mut self.opportunity_locations_by_state,
            DetailField::TargetMocs => &mut self.target_mocs,
            DetailField::OtherEligibilityFactors => &mut self.other_eligibility_factors,
            DetailField::OtherPrerequisite => &mut self.other_prerequisite,
            DetailField::JobsDescription => &mut self.jobs_description,
            DetailField::SummaryDescription => &mut self.summary_description,
            DetailField::JobFamily => &mut self.job_family,
            DetailField::MouOrganization => &mut self.mou_organization,
        };
        *slot = value;
    }
}

/// One employer block: the group-header text plus its opportunities in row order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub company: String,
    pub opportunities: Vec<Opportunity>,
}

/// Final scrape result, serialized as a plain JSON array of locations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset(pub Vec<Location>);

impl Dataset {
    pub fn locations(&self) -> &[Location] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total opportunities across every location
    pub fn opportunity_count(&self) -> usize {
        self.0.iter().map(|l| l.opportunities.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_labels_are_case_sensitive() {
        assert_eq!(DetailField::from_label("Job Family"), Some(DetailField::JobFamily));
        assert_eq!(DetailField::from_label("job family"), None);
        assert_eq!(DetailField::from_label("Job Family:"), None);
    }

    #[test]
    fn set_detail_overwrites() {
        let mut opp = Opportunity::default();
        opp.set_detail(DetailField::TargetMocs, "11B".into());
        opp.set_detail(DetailField::TargetMocs, "25B".into());
        assert_eq!(opp.target_mocs, "25B");
    }

    #[test]
    fn serializes_with_page_field_names() {
        let dataset = Dataset(vec![Location {
            company: "Acme Corp".into(),
            opportunities: vec![Opportunity {
                program_name: "ProgA".into(),
                employer_poc: "POC".into(),
                target_mocs: "11B".into(),
                ..Default::default()
            }],
        }]);

        let value = serde_json::to_value(&dataset).unwrap();
        let opp = &value[0]["opportunities"][0];
        assert_eq!(value[0]["company"], "Acme Corp");
        assert_eq!(opp["programName"], "ProgA");
        assert_eq!(opp["employerPOC"], "POC");
        assert_eq!(opp["targetMOCs"], "11B");
        assert_eq!(opp["mouOrganization"], "");
        assert!(opp.get("latitude").is_none());
    }
}
