macro_rules! v1_path {
    ($path:literal) => {
        concat!("/api/v1", $path)
    };
}

pub const HEALTH: &str = "/health";

/// Versioned API route definitions
pub mod v1 {
    pub const ROOT: &str = "/api/v1";
    pub const VERSION: &str = "v1";

    pub mod vaccinations {
        pub const COLLECTION: &str = v1_path!("/vaccinations");
        pub const ITEM: &str = v1_path!("/vaccinations/{id}");
        pub const COMPLETE_FOLLOW_UP: &str = v1_path!("/vaccinations/{id}/follow-up/complete");
        pub const BY_PATIENT: &str = v1_path!("/patients/{patient_id}/vaccinations");
    }

    pub mod adr_reports {
        pub const COLLECTION: &str = v1_path!("/adr-reports");
        pub const ITEM: &str = v1_path!("/adr-reports/{id}");
    }

    pub mod escalations {
        pub const OPEN: &str = v1_path!("/escalations");
        pub const ITEM: &str = v1_path!("/escalations/{id}");
        pub const ACKNOWLEDGE: &str = v1_path!("/escalations/{id}/acknowledge");
    }

    pub const DASHBOARD: &str = v1_path!("/dashboard");
    pub const VACCINES: &str = v1_path!("/vaccines");

    pub mod maintenance {
        pub const SWEEP: &str = v1_path!("/maintenance/sweep");
    }
}

/// Helper utilities for working with route templates
pub mod utils {
    /// Replace a single path parameter (e.g. `"{id}"`) with the provided value.
    pub fn replace_param(route: &str, param: &str, value: impl AsRef<str>) -> String {
        route.replace(param, value.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_substituted() {
        assert_eq!(
            utils::replace_param(v1::escalations::ACKNOWLEDGE, "{id}", "abc"),
            "/api/v1/escalations/abc/acknowledge"
        );
    }
}
