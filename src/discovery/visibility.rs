use crate::models::{Deal, DealStatus};
use serde::{Deserialize, Serialize};

/// Role of the person browsing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ViewerRole {
    #[default]
    Anonymous,
    Member,
    Admin,
}

impl ViewerRole {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "anonymous" | "anon" => Some(Self::Anonymous),
            "member" | "user" => Some(Self::Member),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

/// Who is looking, as resolved by the session layer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityContext {
    pub viewer_id: Option<String>,
    pub role: ViewerRole,
}

impl VisibilityContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn viewer(id: impl Into<String>, role: ViewerRole) -> Self {
        Self {
            viewer_id: Some(id.into()),
            role,
        }
    }

    pub fn is_owner_of(&self, deal: &Deal) -> bool {
        self.viewer_id.as_deref() == Some(deal.owner_id.as_str())
    }
}

/// Decides which deals a viewer may see before any user filter applies
pub trait VisibilityRule: Send + Sync {
    fn is_visible(&self, deal: &Deal, context: &VisibilityContext) -> bool;
}

impl<F> VisibilityRule for F
where
    F: Fn(&Deal, &VisibilityContext) -> bool + Send + Sync,
{
    fn is_visible(&self, deal: &Deal, context: &VisibilityContext) -> bool {
        self(deal, context)
    }
}

/// Stock marketplace rule: public statuses for everyone, everything for the
/// owner and for elevated roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleVisibility {
    pub public_statuses: Vec<DealStatus>,
    pub elevated_roles: Vec<ViewerRole>,
}

impl Default for RoleVisibility {
    fn default() -> Self {
        Self {
            public_statuses: vec![DealStatus::Active, DealStatus::UnderContract],
            elevated_roles: vec![ViewerRole::Admin],
        }
    }
}

impl VisibilityRule for RoleVisibility {
    fn is_visible(&self, deal: &Deal, context: &VisibilityContext) -> bool {
        deal.status
            .is_some_and(|status| self.public_statuses.contains(&status))
            || context.is_owner_of(deal)
            || self.elevated_roles.contains(&context.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn deal(status: Option<DealStatus>) -> Deal {
        let mut deal = Deal::new("d", "owner-1", 1.0, Utc::now());
        deal.status = status;
        deal
    }

    #[test]
    fn anonymous_sees_only_public_statuses() {
        let rule = RoleVisibility::default();
        let ctx = VisibilityContext::anonymous();
        assert!(rule.is_visible(&deal(Some(DealStatus::Active)), &ctx));
        assert!(!rule.is_visible(&deal(Some(DealStatus::Draft)), &ctx));
        assert!(!rule.is_visible(&deal(None), &ctx));
    }

    #[test]
    fn owner_and_admin_see_drafts() {
        let rule = RoleVisibility::default();
        let draft = deal(Some(DealStatus::Draft));
        assert!(rule.is_visible(&draft, &VisibilityContext::viewer("owner-1", ViewerRole::Member)));
        assert!(!rule.is_visible(&draft, &VisibilityContext::viewer("other", ViewerRole::Member)));
        assert!(rule.is_visible(&draft, &VisibilityContext::viewer("other", ViewerRole::Admin)));
    }

    #[test]
    fn closures_are_rules() {
        let only_sold = |d: &Deal, _: &VisibilityContext| d.status == Some(DealStatus::Sold);
        assert!(only_sold.is_visible(&deal(Some(DealStatus::Sold)), &VisibilityContext::anonymous()));
    }
}
