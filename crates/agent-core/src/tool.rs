//! Function tools exposed to the model.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{self, BoxFuture, FutureExt};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::ToolError;
use crate::model::ToolSpec;

/// A named function the model can invoke with a JSON argument object.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON schema of the argument object.
    fn parameters(&self) -> Value;

    async fn call(&self, arguments: Value) -> Result<String, ToolError>;

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}

type Handler = Box<dyn Fn(Value) -> BoxFuture<'static, Result<String, ToolError>> + Send + Sync>;

/// Tool backed by an async closure over a typed argument struct.
///
/// The parameter schema is derived from the argument type, and decode
/// failures surface as [`ToolError::InvalidArguments`].
pub struct FunctionTool {
    name: String,
    description: String,
    parameters: Value,
    handler: Handler,
}

impl FunctionTool {
    pub fn new<A, F, Fut>(name: impl Into<String>, description: impl Into<String>, func: F) -> Self
    where
        A: DeserializeOwned + JsonSchema + Send + 'static,
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = String> + Send + 'static,
    {
        let handler: Handler = Box::new(move |arguments: Value| {
            match serde_json::from_value::<A>(arguments) {
                Ok(args) => func(args).map(Ok).boxed(),
                Err(err) => future::ready(Err(ToolError::InvalidArguments(err.to_string()))).boxed(),
            }
        });
        Self {
            name: name.into(),
            description: description.into(),
            parameters: schema_value::<A>(),
            handler,
        }
    }

    pub fn into_arc(self) -> Arc<dyn Tool> {
        Arc::new(self)
    }
}

impl fmt::Debug for FunctionTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionTool")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Tool for FunctionTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> Value {
        self.parameters.clone()
    }

    async fn call(&self, arguments: Value) -> Result<String, ToolError> {
        (self.handler)(arguments).await
    }
}

/// JSON schema for `T` without the draft marker and title schemars adds.
pub fn schema_value<T: JsonSchema>() -> Value {
    let schema = schemars::schema_for!(T);
    let mut value = serde_json::to_value(schema).unwrap_or_else(|_| empty_object_schema());
    if let Some(object) = value.as_object_mut() {
        object.remove("$schema");
        object.remove("title");
    }
    value
}

fn empty_object_schema() -> Value {
    serde_json::json!({"type": "object", "properties": {}})
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, JsonSchema)]
    struct Location {
        /// City name.
        location: String,
    }

    fn lookup() -> FunctionTool {
        FunctionTool::new("lookup", "Look a city up", |args: Location| async move {
            format!("looked up {}", args.location)
        })
    }

    #[test]
    fn schema_lists_required_fields() {
        let params = lookup().parameters();
        assert_eq!(params["type"], "object");
        assert!(params.get("$schema").is_none());
        assert_eq!(params["required"][0], "location");
    }

    #[test]
    fn call_decodes_arguments() {
        let tool = lookup();
        let output =
            futures::executor::block_on(tool.call(serde_json::json!({"location": "Busan"})))
                .unwrap();
        assert_eq!(output, "looked up Busan");
    }

    #[test]
    fn bad_arguments_are_reported() {
        let tool = lookup();
        let err = futures::executor::block_on(tool.call(serde_json::json!({"city": 1})))
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
