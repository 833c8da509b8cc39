//! Paths used as navigation targets after a save

use std::fmt;

/// A navigation target understood by the terminal interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    MainMenu,
    Invoices,
    Classpasses,
    ClassTeachers { schedule_item_id: String },
    Locations,
    SubscriptionGroups,
    AccountSubscriptions { account_id: String },
}

impl Route {
    /// Map a path onto a route; anything unrecognised goes to the main menu
    pub fn parse(path: &str) -> Route {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            ["finance", "invoices"] => Route::Invoices,
            ["shop", "classpasses"] => Route::Classpasses,
            ["schedule", "classes", "all", "teachers", id] => Route::ClassTeachers {
                schedule_item_id: id.to_string(),
            },
            ["school", "locations"] => Route::Locations,
            ["organization", "subscriptions", "groups"] => Route::SubscriptionGroups,
            ["relations", "accounts", id, "subscriptions"] => Route::AccountSubscriptions {
                account_id: id.to_string(),
            },
            _ => Route::MainMenu,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::MainMenu => "/".to_string(),
            Route::Invoices => "/finance/invoices".to_string(),
            Route::Classpasses => "/shop/classpasses".to_string(),
            Route::ClassTeachers { schedule_item_id } => {
                format!("/schedule/classes/all/teachers/{}", schedule_item_id)
            }
            Route::Locations => "/school/locations".to_string(),
            Route::SubscriptionGroups => "/organization/subscriptions/groups".to_string(),
            Route::AccountSubscriptions { account_id } => {
                format!("/relations/accounts/{}/subscriptions", account_id)
            }
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::account_subscription::account_subscriptions_path;
    use crate::forms::class_teacher::class_teachers_path;
    use crate::forms::location::LOCATIONS_PATH;
    use crate::forms::subscription_group::SUBSCRIPTION_GROUPS_PATH;

    #[test]
    fn test_form_return_paths_resolve() {
        assert_eq!(Route::parse(LOCATIONS_PATH), Route::Locations);
        assert_eq!(Route::parse(SUBSCRIPTION_GROUPS_PATH), Route::SubscriptionGroups);
        assert_eq!(
            Route::parse(&class_teachers_path("U0k6MQ==")),
            Route::ClassTeachers {
                schedule_item_id: "U0k6MQ==".to_string()
            }
        );
        assert_eq!(
            Route::parse(&account_subscriptions_path("QTox")),
            Route::AccountSubscriptions {
                account_id: "QTox".to_string()
            }
        );
    }

    #[test]
    fn test_path_round_trips_and_unknown_falls_back() {
        let route = Route::ClassTeachers {
            schedule_item_id: "42".to_string(),
        };
        assert_eq!(Route::parse(&route.path()), route);
        assert_eq!(Route::parse("/finance/invoices/"), Route::Invoices);
        assert_eq!(Route::parse("/nowhere"), Route::MainMenu);
        assert_eq!(Route::parse(""), Route::MainMenu);
    }
}
