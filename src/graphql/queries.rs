//! Operation documents sent to the backend
//!
//! Each list query takes `$first` and `$after` so the accumulator can walk
//! the collection page by page.

pub const FINANCE_INVOICES: &str = "FinanceInvoices";
pub const FINANCE_INVOICES_QUERY: &str = r#"
query FinanceInvoices($first: Int!, $after: String, $before: String, $status: String) {
  financeInvoices(first: $first, before: $before, after: $after, status: $status) {
    pageInfo {
      startCursor
      endCursor
      hasNextPage
      hasPreviousPage
    }
    edges {
      node {
        id
        account {
          id
          fullName
        }
        invoiceNumber
        relationCompany
        relationContactName
        status
        summary
        dateSent
        dateDue
        totalDisplay
        balanceDisplay
      }
    }
  }
}
"#;

pub const DELETE_FINANCE_INVOICE: &str = "DeleteFinanceInvoice";
pub const DELETE_FINANCE_INVOICE_MUTATION: &str = r#"
mutation DeleteFinanceInvoice($input: DeleteFinanceInvoiceInput!) {
  deleteFinanceInvoice(input: $input) {
    ok
  }
}
"#;

pub const SCHEDULE_ITEM_TEACHERS: &str = "ScheduleItemTeachers";
pub const SCHEDULE_ITEM_TEACHERS_QUERY: &str = r#"
query ScheduleItemTeachers($first: Int!, $after: String, $before: String, $scheduleItem: ID!) {
  scheduleItemTeachers(first: $first, before: $before, after: $after, scheduleItem: $scheduleItem) {
    pageInfo {
      startCursor
      endCursor
      hasNextPage
      hasPreviousPage
    }
    edges {
      node {
        id
        account {
          id
          fullName
        }
        role
        account2 {
          id
          fullName
        }
        role2
        dateStart
        dateEnd
      }
    }
  }
}
"#;

pub const ORGANIZATION_CLASSPASSES: &str = "OrganizationClasspasses";
pub const ORGANIZATION_CLASSPASSES_QUERY: &str = r#"
query OrganizationClasspasses($first: Int!, $after: String) {
  organizationClasspasses(first: $first, after: $after, archived: false, displayShop: true) {
    pageInfo {
      endCursor
      hasNextPage
    }
    edges {
      node {
        id
        name
        description
        priceDisplay
        validity
        validityUnitDisplay
        classes
        unlimited
      }
    }
  }
}
"#;

pub const CREATE_SCHOOL_LOCATION: &str = "CreateSchoolLocation";
pub const CREATE_SCHOOL_LOCATION_MUTATION: &str = r#"
mutation CreateSchoolLocation($name: String!, $displayPublic: Boolean!) {
  createSchoolLocation(name: $name, displayPublic: $displayPublic) {
    id
    name
    displayPublic
  }
}
"#;

pub const FINANCE_PAYMENT_BATCH_CATEGORY: &str = "FinancePaymentBatchCategory";
pub const FINANCE_PAYMENT_BATCH_CATEGORY_QUERY: &str = r#"
query FinancePaymentBatchCategory($id: ID!) {
  financePaymentBatchCategory(id: $id) {
    id
    name
    batchCategoryType
    description
    archived
  }
}
"#;

pub const UPDATE_FINANCE_PAYMENT_BATCH_CATEGORY: &str = "UpdateFinancePaymentBatchCategory";
pub const UPDATE_FINANCE_PAYMENT_BATCH_CATEGORY_MUTATION: &str = r#"
mutation UpdateFinancePaymentBatchCategory($input: UpdateFinancePaymentBatchCategoryInput!) {
  updateFinancePaymentBatchCategory(input: $input) {
    financePaymentBatchCategory {
      id
      name
      batchCategoryType
      description
    }
  }
}
"#;

pub const ORGANIZATION_SUBSCRIPTION_GROUP: &str = "OrganizationSubscriptionGroup";
pub const ORGANIZATION_SUBSCRIPTION_GROUP_QUERY: &str = r#"
query OrganizationSubscriptionGroup($id: ID!) {
  organizationSubscriptionGroup(id: $id) {
    id
    name
    description
  }
}
"#;

pub const UPDATE_ORGANIZATION_SUBSCRIPTION_GROUP: &str = "UpdateOrganizationSubscriptionGroup";
pub const UPDATE_ORGANIZATION_SUBSCRIPTION_GROUP_MUTATION: &str = r#"
mutation UpdateOrganizationSubscriptionGroup($input: UpdateOrganizationSubscriptionGroupInput!) {
  updateOrganizationSubscriptionGroup(input: $input) {
    organizationSubscriptionGroup {
      id
      name
      description
    }
  }
}
"#;

pub const ACCOUNT_SUBSCRIPTION: &str = "AccountSubscription";
pub const ACCOUNT_SUBSCRIPTION_QUERY: &str = r#"
query AccountSubscription($id: ID!) {
  accountSubscription(id: $id) {
    id
    account {
      id
      fullName
    }
    organizationSubscription {
      id
      name
    }
    financePaymentMethod {
      id
      name
    }
    dateStart
    dateEnd
    note
    registrationFeePaid
  }
}
"#;

pub const UPDATE_ACCOUNT_SUBSCRIPTION: &str = "UpdateAccountSubscription";
pub const UPDATE_ACCOUNT_SUBSCRIPTION_MUTATION: &str = r#"
mutation UpdateAccountSubscription($input: UpdateAccountSubscriptionInput!) {
  updateAccountSubscription(input: $input) {
    accountSubscription {
      id
      organizationSubscription {
        id
        name
      }
      financePaymentMethod {
        id
        name
      }
      dateStart
      dateEnd
      note
      registrationFeePaid
    }
  }
}
"#;

pub const SCHEDULE_ITEM_TEACHER: &str = "ScheduleItemTeacher";
pub const SCHEDULE_ITEM_TEACHER_QUERY: &str = r#"
query ScheduleItemTeacher($id: ID!) {
  scheduleItemTeacher(id: $id) {
    id
    account {
      id
      fullName
    }
    role
    account2 {
      id
      fullName
    }
    role2
    dateStart
    dateEnd
  }
}
"#;

pub const CREATE_SCHEDULE_ITEM_TEACHER: &str = "CreateScheduleItemTeacher";
pub const CREATE_SCHEDULE_ITEM_TEACHER_MUTATION: &str = r#"
mutation CreateScheduleItemTeacher($input: CreateScheduleItemTeacherInput!) {
  createScheduleItemTeacher(input: $input) {
    scheduleItemTeacher {
      id
    }
  }
}
"#;

pub const UPDATE_SCHEDULE_ITEM_TEACHER: &str = "UpdateScheduleItemTeacher";
pub const UPDATE_SCHEDULE_ITEM_TEACHER_MUTATION: &str = r#"
mutation UpdateScheduleItemTeacher($input: UpdateScheduleItemTeacherInput!) {
  updateScheduleItemTeacher(input: $input) {
    scheduleItemTeacher {
      id
    }
  }
}
"#;
