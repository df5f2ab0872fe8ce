//! Short marketing names that older clients still send instead of internal ids.
//!
//! Kept apart from the catalog so the table can be dropped once no client
//! sends these names anymore.

use crate::types::BillingCycle;

/// Maps a legacy alias to an internal id. Subscription aliases pick the
/// yearly tier only when asked for explicitly and fall back to monthly.
pub fn lookup(alias: &str, billing_cycle: Option<BillingCycle>) -> Option<&'static str> {
    let yearly = billing_cycle == Some(BillingCycle::Yearly);

    let internal_id = match alias {
        "starter" => "starter_pack",
        "creator" => "creator_pack",
        "business" => "business_pack",
        "plus" if yearly => "plus_yearly",
        "plus" => "plus_monthly",
        "pro" if yearly => "pro_yearly",
        "pro" => "pro_monthly",
        _ => return None,
    };

    Some(internal_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_aliases_branch_on_cycle() {
        assert_eq!(lookup("plus", Some(BillingCycle::Yearly)), Some("plus_yearly"));
        assert_eq!(lookup("plus", Some(BillingCycle::Monthly)), Some("plus_monthly"));
        assert_eq!(lookup("plus", Some(BillingCycle::OneTime)), Some("plus_monthly"));
        assert_eq!(lookup("pro", None), Some("pro_monthly"));
    }

    #[test]
    fn pack_aliases_ignore_cycle() {
        assert_eq!(lookup("creator", Some(BillingCycle::Yearly)), Some("creator_pack"));
        assert_eq!(lookup("business", None), Some("business_pack"));
    }

    #[test]
    fn aliases_are_case_sensitive() {
        assert_eq!(lookup("Plus", None), None);
        assert_eq!(lookup("enterprise", None), None);
    }
}
