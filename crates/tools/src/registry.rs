//! Tool registry and dispatch.
//!
//! A call goes: look up by name, validate arguments against the input schema, run the action,
//! validate against the output schema (if any), render. Any failure along the way becomes an
//! error-flagged result; nothing is propagated to the protocol layer.

use crate::attachments::{download_contents, find_attachment, upload_source};
use crate::catalog::{
    ACCOUNT_HOLDER_INDIVIDUAL_PATH, ACCOUNT_HOLDER_NAME_PATH, ACCOUNT_HOLDER_PATH, Action,
    FEED_CATEGORY_PATH, FEED_ITEM_ATTACHMENT_PATH, FEED_ITEM_ATTACHMENTS_PATH, FEED_ITEM_PATH,
    RestCall, ToolDef, catalog,
};
use crate::endpoint::{query_string, render_path};
use crate::error::{Result, ToolError};
use crate::render::{error_result, json_result, structured_result};
use crate::schema::{compile, project, to_json_object, violations};
use crate::semantics::annotations_for;
use jsonschema::Validator;
use rmcp::model::{CallToolResult, Content, JsonObject, Tool};
use serde_json::{Value, json};
use starling_api::client::is_truthy;
use starling_api::{Method, StarlingClient};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

enum ToolOutput {
    Json(Value),
    Contents(Vec<Content>),
}

struct RegisteredTool {
    def: ToolDef,
    tool: Tool,
    input: Validator,
    output: Option<(Arc<JsonObject>, Validator)>,
}

pub struct ToolRegistry {
    client: StarlingClient,
    tools: Vec<RegisteredTool>,
}

impl ToolRegistry {
    /// Registry over the full Starling catalog.
    ///
    /// # Errors
    ///
    /// Returns a definition error if a catalog schema fails to compile.
    pub fn new(client: StarlingClient) -> Result<Self> {
        Self::from_defs(client, catalog())
    }

    /// # Errors
    ///
    /// Returns a definition error for duplicate names or schemas that are not valid JSON Schema
    /// objects.
    pub fn from_defs(client: StarlingClient, defs: Vec<ToolDef>) -> Result<Self> {
        let mut names = HashSet::new();
        let mut tools = Vec::with_capacity(defs.len());

        for def in defs {
            if !names.insert(def.name) {
                return Err(ToolError::Definition {
                    tool: def.name.to_string(),
                    details: "duplicate tool name".to_string(),
                });
            }

            let input_schema = Arc::new(to_json_object(def.name, def.input_schema.clone())?);
            let input = compile(def.name, &input_schema)?;

            let output = match &def.output_schema {
                Some(schema) => {
                    let schema = Arc::new(to_json_object(def.name, schema.clone())?);
                    let validator = compile(def.name, &schema)?;
                    Some((schema, validator))
                }
                None => None,
            };

            let mut tool = Tool::new(def.name, def.description, input_schema);
            tool.title = Some(def.title.to_string());
            tool.output_schema = output.as_ref().map(|(schema, _)| schema.clone());
            tool.annotations = Some(annotations_for(&def));

            tools.push(RegisteredTool {
                def,
                tool,
                input,
                output,
            });
        }

        Ok(Self { client, tools })
    }

    #[must_use]
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools.iter().map(|t| t.tool.clone()).collect()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.find(name).map(|t| &t.tool)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Dispatch a tool call. Never fails: errors come back as `isError: true` results.
    pub async fn call_tool(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        debug!(tool = name, "tool call");
        match self.try_call_tool(name, arguments.unwrap_or_default()).await {
            Ok(result) => result,
            Err(e) => {
                warn!(tool = name, error = %e, "tool call failed");
                error_result(&e)
            }
        }
    }

    async fn try_call_tool(&self, name: &str, args: JsonObject) -> Result<CallToolResult> {
        let entry = self
            .find(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        if let Some(details) = violations(&entry.input, &Value::Object(args.clone())) {
            return Err(ToolError::InvalidArguments {
                tool: name.to_string(),
                details,
            });
        }

        match self.execute(&entry.def.action, &args).await? {
            ToolOutput::Contents(contents) => Ok(CallToolResult::success(contents)),
            ToolOutput::Json(value) => match &entry.output {
                None => Ok(json_result(&value)),
                Some((schema, validator)) => {
                    if let Some(details) = violations(validator, &value) {
                        return Err(ToolError::InvalidOutput {
                            tool: name.to_string(),
                            details,
                        });
                    }
                    Ok(structured_result(project(&value, schema)))
                }
            },
        }
    }

    fn find(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.iter().find(|t| t.def.name == name)
    }

    async fn execute(&self, action: &Action, args: &JsonObject) -> Result<ToolOutput> {
        match action {
            Action::Rest(call) => self.rest(call, args).await.map(ToolOutput::Json),
            Action::TransactionFeed => self.transaction_feed(args).await.map(ToolOutput::Json),
            Action::AccountHolder => self.account_holder().await.map(ToolOutput::Json),
            Action::FeedItemWithAttachments => {
                self.feed_item_with_attachments(args).await.map(ToolOutput::Json)
            }
            Action::AttachmentUpload => self.attachment_upload(args).await.map(ToolOutput::Json),
            Action::AttachmentDownload => self
                .attachment_download(args)
                .await
                .map(ToolOutput::Contents),
        }
    }

    async fn rest(&self, call: &RestCall, args: &JsonObject) -> Result<Value> {
        let endpoint = render_path(call.path, args)?;
        let body = call.body.build(args);
        let value = if call.signed {
            self.client
                .signed_call(&endpoint, call.method.clone(), body.as_ref())
                .await?
        } else {
            self.client
                .call(&endpoint, call.method.clone(), body.as_ref())
                .await?
        };
        Ok(value)
    }

    async fn transaction_feed(&self, args: &JsonObject) -> Result<Value> {
        let mut endpoint = render_path(FEED_CATEGORY_PATH, args)?;
        let window = query_string(&[
            (
                "minTransactionTimestamp",
                str_arg(args, "minTransactionTimestamp"),
            ),
            (
                "maxTransactionTimestamp",
                str_arg(args, "maxTransactionTimestamp"),
            ),
        ]);
        if let Some(query) = window {
            endpoint.push_str("/transactions-between?");
            endpoint.push_str(&query);
        }
        Ok(self.client.call(&endpoint, Method::GET, None).await?)
    }

    async fn account_holder(&self) -> Result<Value> {
        let (basic_info, name, individual) = futures::try_join!(
            self.client.call(ACCOUNT_HOLDER_PATH, Method::GET, None),
            self.client.call(ACCOUNT_HOLDER_NAME_PATH, Method::GET, None),
            self.client
                .call(ACCOUNT_HOLDER_INDIVIDUAL_PATH, Method::GET, None),
        )?;
        Ok(json!({
            "basicInfo": basic_info,
            "accountHolderName": name,
            "individualDetails": individual,
        }))
    }

    async fn feed_item_with_attachments(&self, args: &JsonObject) -> Result<Value> {
        let item = self
            .client
            .call(&render_path(FEED_ITEM_PATH, args)?, Method::GET, None)
            .await?;

        // A failing attachment lookup must not hide the feed item itself.
        let attachments = match self
            .client
            .call(&render_path(FEED_ITEM_ATTACHMENTS_PATH, args)?, Method::GET, None)
            .await
        {
            Ok(listing) => listing
                .get("feedItemAttachments")
                .filter(|v| is_truthy(v))
                .cloned()
                .unwrap_or_else(|| json!([])),
            Err(e) => {
                warn!(error = %e, "attachment lookup failed; returning feed item without attachments");
                json!([])
            }
        };

        Ok(match item {
            Value::Object(mut obj) => {
                obj.insert("attachments".to_string(), attachments);
                Value::Object(obj)
            }
            other => json!({ "feedItem": other, "attachments": attachments }),
        })
    }

    async fn attachment_upload(&self, args: &JsonObject) -> Result<Value> {
        let data = upload_source(args).await?;
        let endpoint = render_path(FEED_ITEM_ATTACHMENTS_PATH, args)?;
        let content_type = Some(str_arg(args, "contentType")).filter(|s| !s.is_empty());
        Ok(self
            .client
            .upload_binary(&endpoint, data, content_type)
            .await?)
    }

    async fn attachment_download(&self, args: &JsonObject) -> Result<Vec<Content>> {
        let listing = self
            .client
            .call(&render_path(FEED_ITEM_ATTACHMENTS_PATH, args)?, Method::GET, None)
            .await?;
        let meta = find_attachment(&listing, str_arg(args, "feedItemAttachmentUid"));
        let bytes = self
            .client
            .download_binary(&render_path(FEED_ITEM_ATTACHMENT_PATH, args)?)
            .await?;
        Ok(download_contents(meta, &bytes))
    }
}

fn str_arg<'a>(args: &'a JsonObject, key: &str) -> &'a str {
    args.get(key).and_then(Value::as_str).unwrap_or_default()
}
