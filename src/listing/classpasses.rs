//! Classpasses offered in the shop

use crate::graphql::queries::{ORGANIZATION_CLASSPASSES, ORGANIZATION_CLASSPASSES_QUERY};
use crate::listing::ListQuery;
use crate::models::Classpass;

pub fn classpasses_query(page_size: usize) -> ListQuery<Classpass> {
    ListQuery::new(ORGANIZATION_CLASSPASSES, ORGANIZATION_CLASSPASSES_QUERY, "organizationClasspasses")
        .with_page_size(page_size)
}

pub fn describe(pass: &Classpass) -> String {
    format!(
        "{} - {} - {} {} - {}",
        pass.name,
        pass.price_display,
        pass.validity,
        pass.validity_unit_display,
        pass.classes_display()
    )
}
