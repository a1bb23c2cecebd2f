//! The tool catalog: one declarative row per tool.
//!
//! Plain REST tools are fully described by a [`RestCall`] and executed by the generic dispatcher
//! in [`crate::registry`]. The handful of tools with their own control flow (concurrent fetches,
//! attachment handling, optional query window) get a dedicated [`Action`] variant.

use crate::endpoint::UUID_PLACEHOLDER;
use crate::schema::{amount, boolean, describe, object, string, string_enum};
use rmcp::model::JsonObject;
use serde_json::{Map, Value, json};
use starling_api::Method;
use uuid::Uuid;

pub const FEED_ITEM_PATH: &str =
    "/api/v2/feed/account/{accountUid}/category/{categoryUid}/{feedItemUid}";
pub const FEED_ITEM_ATTACHMENTS_PATH: &str =
    "/api/v2/feed/account/{accountUid}/category/{categoryUid}/{feedItemUid}/attachments";
pub const FEED_ITEM_ATTACHMENT_PATH: &str = "/api/v2/feed/account/{accountUid}/category/{categoryUid}/{feedItemUid}/attachments/{feedItemAttachmentUid}";
pub const FEED_CATEGORY_PATH: &str = "/api/v2/feed/account/{accountUid}/category/{categoryUid}";

pub const ACCOUNT_HOLDER_PATH: &str = "/api/v2/account-holder";
pub const ACCOUNT_HOLDER_NAME_PATH: &str = "/api/v2/account-holder/name";
pub const ACCOUNT_HOLDER_INDIVIDUAL_PATH: &str = "/api/v2/account-holder/individual";

pub struct ToolDef {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
    pub output_schema: Option<Value>,
    pub read_only: bool,
    pub action: Action,
}

pub enum Action {
    Rest(RestCall),
    /// Feed items for a category, optionally windowed by `transactions-between`.
    TransactionFeed,
    /// Three account-holder reads issued concurrently and merged.
    AccountHolder,
    /// Feed item plus its attachment list; a failing attachment lookup yields `[]`.
    FeedItemWithAttachments,
    AttachmentUpload,
    AttachmentDownload,
}

impl Action {
    /// The HTTP method that characterises the tool (first call for multi-call actions).
    #[must_use]
    pub fn method(&self) -> Method {
        match self {
            Self::Rest(call) => call.method.clone(),
            Self::AttachmentUpload => Method::POST,
            Self::TransactionFeed
            | Self::AccountHolder
            | Self::FeedItemWithAttachments
            | Self::AttachmentDownload => Method::GET,
        }
    }

    #[must_use]
    pub fn mints_idempotency_key(&self) -> bool {
        match self {
            Self::Rest(call) => {
                call.path.contains(UUID_PLACEHOLDER) || matches!(call.body, BodySpec::Payment)
            }
            _ => false,
        }
    }
}

pub struct RestCall {
    pub method: Method,
    pub path: &'static str,
    pub body: BodySpec,
    /// Requires the HTTP signature on top of the bearer token.
    pub signed: bool,
}

impl RestCall {
    fn get(path: &'static str) -> Self {
        Self {
            method: Method::GET,
            path,
            body: BodySpec::Empty,
            signed: false,
        }
    }

    fn put(path: &'static str, body: BodySpec) -> Self {
        Self {
            method: Method::PUT,
            path,
            body,
            signed: false,
        }
    }

    fn delete(path: &'static str) -> Self {
        Self {
            method: Method::DELETE,
            path,
            body: BodySpec::Empty,
            signed: false,
        }
    }
}

pub enum BodySpec {
    Empty,
    /// Copy these arguments into a flat body; absent ones are left out.
    Fields(&'static [&'static str]),
    /// Payee with a single bank account.
    Payee,
    /// Local payment with a fresh `externalIdentifier`.
    Payment,
}

impl BodySpec {
    #[must_use]
    pub fn build(&self, args: &JsonObject) -> Option<Value> {
        match self {
            Self::Empty => None,
            Self::Fields(fields) => Some(Value::Object(pick(args, fields))),
            Self::Payee => {
                let mut body = pick(args, &["payeeName", "phoneNumber", "payeeType"]);
                body.insert(
                    "accounts".to_string(),
                    json!([pick(
                        args,
                        &[
                            "accountIdentifier",
                            "bankIdentifier",
                            "bankIdentifierType",
                            "countryCode",
                        ],
                    )]),
                );
                Some(Value::Object(body))
            }
            Self::Payment => {
                let mut body = pick(args, &["destinationPayeeAccountUid", "reference", "amount"]);
                body.insert(
                    "externalIdentifier".to_string(),
                    json!(Uuid::new_v4().to_string()),
                );
                Some(Value::Object(body))
            }
        }
    }
}

fn pick(args: &JsonObject, fields: &[&str]) -> Map<String, Value> {
    fields
        .iter()
        .filter_map(|f| args.get(*f).map(|v| ((*f).to_string(), v.clone())))
        .collect()
}

// Shared argument schemas.

fn account_uid() -> (&'static str, Value, bool) {
    ("accountUid", string("The account UID"), true)
}

fn category_uid() -> (&'static str, Value, bool) {
    (
        "categoryUid",
        string("The category UID (use default category for main account)"),
        true,
    )
}

fn feed_item_uid() -> (&'static str, Value, bool) {
    ("feedItemUid", string("The feed item UID"), true)
}

fn savings_goal_uid() -> (&'static str, Value, bool) {
    ("savingsGoalUid", string("The savings goal UID"), true)
}

fn feed_item_args() -> Vec<(&'static str, Value, bool)> {
    vec![account_uid(), category_uid(), feed_item_uid()]
}

fn with(
    mut base: Vec<(&'static str, Value, bool)>,
    extra: Vec<(&'static str, Value, bool)>,
) -> Vec<(&'static str, Value, bool)> {
    base.extend(extra);
    base
}

fn transfer_amount() -> (&'static str, Value, bool) {
    ("amount", amount("Amount in minor units (e.g., pence)"), true)
}

fn savings_goal_fields(target_minor_units: &str) -> Vec<(&'static str, Value, bool)> {
    vec![
        ("name", string("Name of the savings goal"), true),
        ("currency", string("Currency code (e.g., GBP)"), true),
        (
            "target",
            describe(
                amount(target_minor_units),
                "Target amount for the savings goal",
            ),
            false,
        ),
    ]
}

// Output contracts.

fn savings_goal_output() -> Value {
    object(vec![
        ("savingsGoalUid", json!({"type": "string"}), false),
        ("success", json!({"type": "boolean"}), false),
    ])
}

fn transfer_output() -> Value {
    object(vec![
        ("transferUid", json!({"type": "string"}), true),
        ("success", json!({"type": "boolean"}), false),
    ])
}

fn feed_item_update_output() -> Value {
    object(vec![("success", json!({"type": "boolean"}), false)])
}

fn attachment_upload_output() -> Value {
    object(vec![(
        "feedItemAttachmentUid",
        json!({"type": "string"}),
        false,
    )])
}

/// Every tool the server exposes, in listing order.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn catalog() -> Vec<ToolDef> {
    vec![
        ToolDef {
            name: "accounts_list",
            title: "Get all accounts",
            description: "Get all accounts associated with the logged in account holder. This is typically the first call to make to get account information. An account holder (e.g. a person or business) can have multiple accounts (e.g. a GBP and EUR account).",
            input_schema: object(vec![]),
            output_schema: None,
            read_only: true,
            action: Action::Rest(RestCall::get("/api/v2/accounts")),
        },
        ToolDef {
            name: "account_balance_get",
            title: "Get account balance",
            description: "Get the balance for a specific account. Shows both cleared balance (settled transactions) and effective balance (including pending transactions).",
            input_schema: object(vec![account_uid()]),
            output_schema: None,
            read_only: true,
            action: Action::Rest(RestCall::get("/api/v2/accounts/{accountUid}/balance")),
        },
        ToolDef {
            name: "account_identifiers_get",
            title: "Get account identifiers",
            description: "Get an account's bank identifiers (sort code, account number, BIC, IBAN, etc.)",
            input_schema: object(vec![account_uid()]),
            output_schema: None,
            read_only: true,
            action: Action::Rest(RestCall::get("/api/v2/accounts/{accountUid}/identifiers")),
        },
        ToolDef {
            name: "account_holder_get",
            title: "Get account holder details",
            description: "Get detailed information about the logged in account holder including name, address, and other personal details.",
            input_schema: object(vec![]),
            output_schema: None,
            read_only: true,
            action: Action::AccountHolder,
        },
        ToolDef {
            name: "transactions_list",
            title: "List transactions",
            description: "Get transaction feed items for an account category. Use the default category UID for main account transactions.",
            input_schema: object(vec![
                account_uid(),
                category_uid(),
                (
                    "minTransactionTimestamp",
                    string("Start date for transactions (ISO 8601 format, e.g., 2024-01-01T00:00:00.000Z)"),
                    true,
                ),
                (
                    "maxTransactionTimestamp",
                    string("End date for transactions (ISO 8601 format, e.g., 2024-12-31T23:59:59.999Z)"),
                    true,
                ),
            ]),
            output_schema: None,
            read_only: true,
            action: Action::TransactionFeed,
        },
        ToolDef {
            name: "feed_item_get",
            title: "Get transaction details",
            description: "Get details of a specific feed item (transaction) including any attachments",
            input_schema: object(feed_item_args()),
            output_schema: None,
            read_only: true,
            action: Action::FeedItemWithAttachments,
        },
        ToolDef {
            name: "feed_item_spending_category_update",
            title: "Update transaction spending category",
            description: "Update the spending category for a transaction",
            input_schema: object(with(
                feed_item_args(),
                vec![(
                    "spendingCategory",
                    string("The spending category to set"),
                    true,
                )],
            )),
            output_schema: Some(feed_item_update_output()),
            read_only: false,
            action: Action::Rest(RestCall::put(
                "/api/v2/feed/account/{accountUid}/category/{categoryUid}/{feedItemUid}/spending-category",
                BodySpec::Fields(&["spendingCategory"]),
            )),
        },
        ToolDef {
            name: "feed_item_note_update",
            title: "Update transaction note",
            description: "Update the user note for a transaction",
            input_schema: object(with(
                feed_item_args(),
                vec![(
                    "userNote",
                    string("The user note to set for this transaction"),
                    true,
                )],
            )),
            output_schema: Some(feed_item_update_output()),
            read_only: false,
            action: Action::Rest(RestCall::put(
                "/api/v2/feed/account/{accountUid}/category/{categoryUid}/{feedItemUid}/user-note",
                BodySpec::Fields(&["userNote"]),
            )),
        },
        ToolDef {
            name: "feed_item_attachment_upload",
            title: "Upload transaction attachment",
            description: "Upload an attachment to a feed item (transaction). Provide either base64 encoded attachment data or a file path (recommended).",
            input_schema: object(with(
                feed_item_args(),
                vec![
                    (
                        "contentType",
                        string("Content type of the attachment (e.g., image/jpeg, application/pdf)"),
                        false,
                    ),
                    (
                        "filePath",
                        string("Option 1: Path to file on disk (recommended)"),
                        false,
                    ),
                    (
                        "attachmentData",
                        string("Option 2: Base64 encoded attachment data"),
                        false,
                    ),
                ],
            )),
            output_schema: Some(attachment_upload_output()),
            read_only: false,
            action: Action::AttachmentUpload,
        },
        ToolDef {
            name: "feed_item_attachment_download",
            title: "Download transaction attachment",
            description: "Download a specific attachment from a feed item (transaction). Returns the attachment as base64 encoded data.",
            input_schema: object(with(
                feed_item_args(),
                vec![(
                    "feedItemAttachmentUid",
                    string("The feed item attachment UID"),
                    true,
                )],
            )),
            output_schema: None,
            read_only: true,
            action: Action::AttachmentDownload,
        },
        ToolDef {
            name: "cards_list",
            title: "List all cards",
            description: "Get all the cards for an account holder",
            input_schema: object(vec![]),
            output_schema: None,
            read_only: true,
            action: Action::Rest(RestCall::get("/api/v2/cards")),
        },
        ToolDef {
            name: "card_lock_update",
            title: "Lock or unlock card",
            description: "Enable or disable (lock/unlock) a card",
            input_schema: object(vec![
                ("cardUid", string("The card UID"), true),
                (
                    "enabled",
                    boolean("Whether the control should be enabled (true) or disabled (false)"),
                    true,
                ),
            ]),
            output_schema: None,
            read_only: false,
            action: Action::Rest(RestCall::put(
                "/api/v2/cards/{cardUid}/controls/enabled",
                BodySpec::Fields(&["enabled"]),
            )),
        },
        ToolDef {
            name: "direct_debits_list",
            title: "List direct debits",
            description: "Get all direct debit mandates for an account",
            input_schema: object(vec![account_uid()]),
            output_schema: None,
            read_only: true,
            action: Action::Rest(RestCall::get(
                "/api/v2/direct-debit/mandates/account/{accountUid}",
            )),
        },
        ToolDef {
            name: "standing_orders_list",
            title: "List standing orders",
            description: "Get all standing orders for an account category",
            input_schema: object(vec![account_uid(), category_uid()]),
            output_schema: None,
            read_only: true,
            action: Action::Rest(RestCall::get(
                "/api/v2/payments/local/account/{accountUid}/category/{categoryUid}/standing-orders",
            )),
        },
        ToolDef {
            name: "payees_list",
            title: "List all payees",
            description: "Get all payees (people/companies you can send payments to) for the account holder.",
            input_schema: object(vec![]),
            output_schema: None,
            read_only: true,
            action: Action::Rest(RestCall::get("/api/v2/payees")),
        },
        ToolDef {
            name: "payee_create",
            title: "Create new payee",
            description: "Create a new payee (person/company you can send payments to)",
            input_schema: object(vec![
                ("payeeName", string("Name of the payee"), true),
                ("phoneNumber", string("Phone number of the payee"), false),
                (
                    "payeeType",
                    string_enum(&["INDIVIDUAL", "BUSINESS"], "Type of payee"),
                    true,
                ),
                (
                    "accountIdentifier",
                    string("Account number or identifier"),
                    true,
                ),
                (
                    "bankIdentifier",
                    string("Sort code or bank identifier"),
                    true,
                ),
                (
                    "bankIdentifierType",
                    string_enum(&["SORT_CODE", "SWIFT_BIC"], "Type of bank identifier"),
                    true,
                ),
                ("countryCode", string("Country code (e.g., GB)"), true),
            ]),
            output_schema: None,
            read_only: false,
            action: Action::Rest(RestCall::put("/api/v2/payees", BodySpec::Payee)),
        },
        ToolDef {
            name: "payee_delete",
            title: "Delete payee",
            description: "Delete a payee",
            input_schema: object(vec![("payeeUid", string("The payee UID"), true)]),
            output_schema: None,
            read_only: false,
            action: Action::Rest(RestCall::delete("/api/v2/payees/{payeeUid}")),
        },
        ToolDef {
            name: "payment_create",
            title: "Create payment",
            description: "Create a payment to an existing payee",
            input_schema: object(vec![
                account_uid(),
                category_uid(),
                (
                    "destinationPayeeAccountUid",
                    string("The UID of the payee account to pay"),
                    true,
                ),
                ("reference", string("Payment reference"), true),
                transfer_amount(),
            ]),
            output_schema: None,
            read_only: false,
            action: Action::Rest(RestCall {
                method: Method::PUT,
                path: "/api/v2/payments/local/account/{accountUid}/category/{categoryUid}",
                body: BodySpec::Payment,
                signed: true,
            }),
        },
        ToolDef {
            name: "savings_goals_list",
            title: "List savings goals",
            description: "Get all savings goals for an account",
            input_schema: object(vec![account_uid()]),
            output_schema: None,
            read_only: true,
            action: Action::Rest(RestCall::get("/api/v2/account/{accountUid}/savings-goals")),
        },
        ToolDef {
            name: "savings_goal_create",
            title: "Create savings goal",
            description: "Create a new savings goal",
            input_schema: object(with(
                vec![account_uid()],
                savings_goal_fields("Target amount in minor units (e.g., pence)"),
            )),
            output_schema: Some(savings_goal_output()),
            read_only: false,
            action: Action::Rest(RestCall::put(
                "/api/v2/account/{accountUid}/savings-goals",
                BodySpec::Fields(&["name", "currency", "target"]),
            )),
        },
        ToolDef {
            name: "savings_goal_update",
            title: "Update savings goal",
            description: "Update an existing savings goal",
            input_schema: object(with(
                vec![account_uid(), savings_goal_uid()],
                savings_goal_fields("Amount in minor units (e.g., pence)"),
            )),
            output_schema: Some(savings_goal_output()),
            read_only: false,
            action: Action::Rest(RestCall::put(
                "/api/v2/account/{accountUid}/savings-goals/{savingsGoalUid}",
                BodySpec::Fields(&["name", "currency", "target"]),
            )),
        },
        ToolDef {
            name: "savings_goal_delete",
            title: "Delete savings goal",
            description: "Delete a savings goal",
            input_schema: object(vec![account_uid(), savings_goal_uid()]),
            output_schema: None,
            read_only: false,
            action: Action::Rest(RestCall::delete(
                "/api/v2/account/{accountUid}/savings-goals/{savingsGoalUid}",
            )),
        },
        ToolDef {
            name: "savings_goal_deposit",
            title: "Deposit to savings goal",
            description: "Add money to a savings goal",
            input_schema: object(vec![account_uid(), savings_goal_uid(), transfer_amount()]),
            output_schema: Some(transfer_output()),
            read_only: false,
            action: Action::Rest(RestCall::put(
                "/api/v2/account/{accountUid}/savings-goals/{savingsGoalUid}/add-money/{@uuid}",
                BodySpec::Fields(&["amount"]),
            )),
        },
        ToolDef {
            name: "savings_goal_withdraw",
            title: "Withdraw from savings goal",
            description: "Withdraw money from a savings goal",
            input_schema: object(vec![account_uid(), savings_goal_uid(), transfer_amount()]),
            output_schema: Some(transfer_output()),
            read_only: false,
            action: Action::Rest(RestCall::put(
                "/api/v2/account/{accountUid}/savings-goals/{savingsGoalUid}/withdraw-money/{@uuid}",
                BodySpec::Fields(&["amount"]),
            )),
        },
    ]
}
