//! Chat (Hugging Face) Node
//!
//! Sends a prompt to a Hugging Face text-generation model, either on the
//! shared inference API or on a dedicated inference endpoint, and streams
//! the generated text back token by token.
//!
//! Every sampling parameter lives in the node's data and can be switched
//! over to an input port through its `use*Input` flag.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::StreamExt;
use graph_flow::{Context, NextAction, Task, TaskResult};
use hf_inference::{
    BackendError, ClientFactory, HfClientFactory, InferenceTarget, TextGenerationParameters,
    TextGenerationRequest,
};
use node_engine::{
    coerce, extension_keys, get_input_or_data, ContextKeys, DataValue, EditorDefinition,
    EventSink, ExecutionMode, ExecutorExtensions, Inputs, NodeCategory, NodeEngineError,
    NodeExecutor, NodeInstance, NodeUiData, Outputs, PluginConfig, PortDataType, PortMetadata,
    ProcessContext, Result, TaskDescriptor, TaskMetadata, VisualData,
};
use serde::{Deserialize, Serialize};

use crate::plugin::{self, ACCESS_TOKEN_KEY, PLUGIN_ID};

/// Model used by freshly created nodes
pub const DEFAULT_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.1";

/// Editable settings of a chat node
///
/// Each parameter is paired with a flag that, when set, lets a connected
/// input port override the value at execution time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatHuggingFaceNodeData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub use_model_input: bool,

    /// Dedicated inference endpoint; takes precedence over `model`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    pub use_endpoint_input: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    pub use_temperature_input: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_new_tokens: Option<u32>,
    pub use_max_new_tokens_input: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub do_sample: Option<bool>,
    pub use_do_sample_input: bool,

    /// Seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_time: Option<f64>,
    pub use_max_time_input: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetition_penalty: Option<f64>,
    pub use_repetition_penalty_input: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    pub use_top_p_input: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    pub use_top_k_input: bool,

    // Port flags without a backing value. They only shape the input ports.
    pub use_max_tokens_input: bool,
    pub use_frequency_penalty_input: bool,
    pub use_stop_input: bool,
}

impl Default for ChatHuggingFaceNodeData {
    fn default() -> Self {
        Self {
            model: Some(DEFAULT_MODEL.to_string()),
            use_model_input: false,
            endpoint: None,
            use_endpoint_input: false,
            temperature: Some(0.5),
            use_temperature_input: false,
            max_new_tokens: Some(1024),
            use_max_new_tokens_input: false,
            do_sample: Some(true),
            use_do_sample_input: false,
            max_time: None,
            use_max_time_input: false,
            repetition_penalty: None,
            use_repetition_penalty_input: false,
            top_p: None,
            use_top_p_input: false,
            top_k: None,
            use_top_k_input: false,
            use_max_tokens_input: false,
            use_frequency_penalty_input: false,
            use_stop_input: false,
        }
    }
}

/// Chat (Hugging Face) node definition
///
/// Metadata functions are pure over [`ChatHuggingFaceNodeData`]; the
/// host calls them again whenever the data changes.
pub struct ChatHuggingFaceNode;

impl ChatHuggingFaceNode {
    /// Node type identifier
    pub const NODE_TYPE: &'static str = "chatHuggingFace";
    /// Default title of new nodes
    pub const TITLE: &'static str = "Chat (Hugging Face)";

    /// Port ID for prompt input
    pub const PORT_PROMPT: &'static str = "prompt";
    /// Port ID for system message input
    pub const PORT_SYSTEM_MESSAGE: &'static str = "system-message";
    /// Port ID for generated text output
    pub const PORT_OUTPUT: &'static str = "output";

    /// Ports read when resolving parameters against node data
    pub const PORT_MODEL: &'static str = "model";
    pub const PORT_ENDPOINT: &'static str = "endpoint";
    pub const PORT_TEMPERATURE: &'static str = "temperature";
    pub const PORT_MAX_NEW_TOKENS: &'static str = "maxNewTokens";
    pub const PORT_DO_SAMPLE: &'static str = "doSample";
    pub const PORT_MAX_TIME: &'static str = "maxTime";
    pub const PORT_REPETITION_PENALTY: &'static str = "repetitionPenalty";
    pub const PORT_TOP_P: &'static str = "topP";
    pub const PORT_TOP_K: &'static str = "topK";

    const RESOLVED_PORTS: [&'static str; 9] = [
        Self::PORT_MODEL,
        Self::PORT_ENDPOINT,
        Self::PORT_TEMPERATURE,
        Self::PORT_MAX_NEW_TOKENS,
        Self::PORT_DO_SAMPLE,
        Self::PORT_MAX_TIME,
        Self::PORT_REPETITION_PENALTY,
        Self::PORT_TOP_P,
        Self::PORT_TOP_K,
    ];

    /// New node with default data and a fresh id
    pub fn create() -> NodeInstance<ChatHuggingFaceNodeData> {
        NodeInstance {
            id: uuid::Uuid::new_v4().to_string(),
            node_type: Self::NODE_TYPE.to_string(),
            title: Self::TITLE.to_string(),
            data: ChatHuggingFaceNodeData::default(),
            visual_data: VisualData {
                x: 0.0,
                y: 0.0,
                width: Some(300.0),
            },
        }
    }

    pub fn ui_data() -> NodeUiData {
        NodeUiData {
            context_menu_title: "Chat".to_string(),
            group: "Hugging Face".to_string(),
            info_box_title: "Chat (Hugging Face) Node".to_string(),
            info_box_body: "Makes a call to a Hugging Face text generation model. Pick a model \
                            from the Inference API or point the node at your own Inference \
                            Endpoint. The response is streamed to the output as it is generated."
                .to_string(),
        }
    }

    /// Input ports for the current data
    ///
    /// `prompt` and `system-message` come first, then one number port per
    /// enabled flag in a fixed order.
    pub fn input_definitions(data: &ChatHuggingFaceNodeData) -> Vec<PortMetadata> {
        let mut inputs = vec![
            PortMetadata::required(Self::PORT_PROMPT, "Prompt", PortDataType::String),
            PortMetadata::required(
                Self::PORT_SYSTEM_MESSAGE,
                "System Message",
                PortDataType::String,
            ),
        ];

        let toggled = [
            (data.use_temperature_input, "temperature", "Temperature"),
            (data.use_max_tokens_input, "max_tokens", "Max Tokens"),
            (data.use_frequency_penalty_input, "frequency_penalty", "Frequency Penalty"),
            (data.use_top_p_input, "top_p", "Top P"),
            (data.use_stop_input, "stop", "Stop"),
        ];
        inputs.extend(
            toggled
                .into_iter()
                .filter(|(enabled, _, _)| *enabled)
                .map(|(_, id, title)| PortMetadata::required(id, title, PortDataType::Number)),
        );

        inputs
    }

    pub fn output_definitions() -> Vec<PortMetadata> {
        vec![PortMetadata::required(Self::PORT_OUTPUT, "Output", PortDataType::String)]
    }

    pub fn editors() -> Vec<EditorDefinition> {
        vec![
            EditorDefinition::string("Model", "model").with_input_toggle("useModelInput"),
            EditorDefinition::string("Endpoint", "endpoint").with_input_toggle("useEndpointInput"),
            EditorDefinition::number("Temperature", "temperature")
                .with_range(Some(0.0), Some(2.0), Some(0.1))
                .with_input_toggle("useTemperatureInput"),
            EditorDefinition::number("Max New Tokens", "maxNewTokens")
                .with_range(Some(0.0), None, Some(1.0))
                .with_input_toggle("useMaxNewTokensInput"),
            EditorDefinition::toggle("Do Sample", "doSample").with_input_toggle("useDoSampleInput"),
            EditorDefinition::number("Max Time", "maxTime")
                .allow_empty()
                .with_input_toggle("useMaxTimeInput"),
            EditorDefinition::number("Repetition Penalty", "repetitionPenalty")
                .allow_empty()
                .with_input_toggle("useRepetitionPenaltyInput"),
            EditorDefinition::number("Top P", "topP")
                .with_range(Some(0.0), Some(1.0), None)
                .allow_empty()
                .with_input_toggle("useTopPInput"),
            EditorDefinition::number("Top K", "topK")
                .with_range(Some(0.0), None, None)
                .allow_empty()
                .with_input_toggle("useTopKInput"),
        ]
    }

    /// Summary text shown on the node
    pub fn body(data: &ChatHuggingFaceNodeData) -> String {
        let mut lines = Vec::with_capacity(3);

        lines.push(if data.use_endpoint_input {
            "Endpoint: (Using Input)".to_string()
        } else if data.endpoint.as_deref().is_some_and(|e| !e.is_empty()) {
            "Endpoint: Yes".to_string()
        } else if data.use_model_input {
            "Model: (Using Input)".to_string()
        } else {
            format!("Model: {}", data.model.as_deref().unwrap_or_default())
        });

        if data.use_temperature_input {
            lines.push("Temperature: (Using Input)".to_string());
        } else if let Some(temperature) = data.temperature {
            lines.push(format!("Temperature: {}", temperature));
        }

        if data.use_max_new_tokens_input {
            lines.push("Max New Tokens: (Using Input)".to_string());
        } else if let Some(max_new_tokens) = data.max_new_tokens {
            lines.push(format!("Max New Tokens: {}", max_new_tokens));
        }

        lines.join("\n")
    }

    /// Run the node
    ///
    /// Fails with [`NodeEngineError::InvalidInputType`] before any client
    /// is built when the prompt is missing or not a string.
    pub async fn process(
        data: &ChatHuggingFaceNodeData,
        inputs: &Inputs,
        ctx: &ProcessContext<'_>,
        clients: &dyn ClientFactory,
    ) -> Result<Outputs> {
        let prompt: String = coerce(inputs, Self::PORT_PROMPT)?;

        let model = get_input_or_data(
            data.use_model_input,
            data.model.clone(),
            inputs,
            Self::PORT_MODEL,
        )?;
        let endpoint = get_input_or_data(
            data.use_endpoint_input,
            data.endpoint.clone(),
            inputs,
            Self::PORT_ENDPOINT,
        )?;
        let parameters = TextGenerationParameters {
            temperature: get_input_or_data(
                data.use_temperature_input,
                data.temperature,
                inputs,
                Self::PORT_TEMPERATURE,
            )?,
            max_new_tokens: get_input_or_data(
                data.use_max_new_tokens_input,
                data.max_new_tokens,
                inputs,
                Self::PORT_MAX_NEW_TOKENS,
            )?,
            do_sample: get_input_or_data(
                data.use_do_sample_input,
                data.do_sample,
                inputs,
                Self::PORT_DO_SAMPLE,
            )?,
            max_time: get_input_or_data(
                data.use_max_time_input,
                data.max_time,
                inputs,
                Self::PORT_MAX_TIME,
            )?,
            repetition_penalty: get_input_or_data(
                data.use_repetition_penalty_input,
                data.repetition_penalty,
                inputs,
                Self::PORT_REPETITION_PENALTY,
            )?,
            top_p: get_input_or_data(data.use_top_p_input, data.top_p, inputs, Self::PORT_TOP_P)?,
            top_k: get_input_or_data(data.use_top_k_input, data.top_k, inputs, Self::PORT_TOP_K)?,
        };

        let access_token = ctx.plugin_config(ACCESS_TOKEN_KEY);

        let target = match endpoint.filter(|e| !e.trim().is_empty()) {
            Some(url) => InferenceTarget::Endpoint(url),
            None => match model.filter(|m| !m.trim().is_empty()) {
                Some(model) => InferenceTarget::Model(model),
                None => {
                    return Err(NodeEngineError::Config(
                        "No model or endpoint configured for Hugging Face chat".to_string(),
                    ))
                }
            },
        };

        log::debug!("ChatHuggingFace {}: generating with {:?}", ctx.task_id(), target);

        let client = clients
            .connect(&target, access_token.as_deref())
            .map_err(backend_error)?;
        let request = TextGenerationRequest::new(prompt).with_parameters(parameters);
        let mut stream = client
            .text_generation_stream(request)
            .await
            .map_err(backend_error)?;

        let mut text = String::new();
        let mut tokens = 0usize;
        while let Some(record) = stream.next().await {
            let record = record.map_err(backend_error)?;
            tokens += 1;

            if !record.token.special {
                text.push_str(&record.token.text);
            }

            if ctx.has_partial_output_listener() {
                ctx.on_partial_outputs(&Self::outputs(&text)).await;
            }
        }

        log::debug!(
            "ChatHuggingFace {}: received {} tokens ({} chars)",
            ctx.task_id(),
            tokens,
            text.len()
        );

        Ok(Self::outputs(&text))
    }

    fn outputs(text: &str) -> Outputs {
        let mut outputs = Outputs::new();
        outputs.insert(Self::PORT_OUTPUT.to_string(), DataValue::from(text));
        outputs
    }

    /// Ports whose values `process` may read
    fn consumed_ports(data: &ChatHuggingFaceNodeData) -> Vec<String> {
        let mut ports: Vec<String> = Self::input_definitions(data)
            .into_iter()
            .map(|p| p.id)
            .collect();
        for port in Self::RESOLVED_PORTS {
            if !ports.iter().any(|p| p == port) {
                ports.push(port.to_string());
            }
        }
        ports
    }
}

fn backend_error(e: BackendError) -> NodeEngineError {
    NodeEngineError::Backend(e.to_string())
}

impl TaskDescriptor for ChatHuggingFaceNode {
    fn descriptor() -> TaskMetadata {
        TaskMetadata {
            node_type: Self::NODE_TYPE.to_string(),
            category: NodeCategory::Processing,
            label: Self::TITLE.to_string(),
            description: "Streams a chat completion from a Hugging Face text generation model"
                .to_string(),
            inputs: Self::input_definitions(&ChatHuggingFaceNodeData::default()),
            outputs: Self::output_definitions(),
            execution_mode: ExecutionMode::Stream,
        }
    }
}

inventory::submit!(node_engine::DescriptorFn(ChatHuggingFaceNode::descriptor));

/// Registry executor for `chatHuggingFace` nodes
///
/// Reads the node data from `_data`. Plugin configuration, the event sink,
/// the execution id and the client factory come from the extensions when
/// the host provided them. Partial outputs are also written to the stream
/// keys of the graph context.
pub struct ChatHuggingFaceExecutor;

#[async_trait]
impl NodeExecutor for ChatHuggingFaceExecutor {
    async fn execute(
        &self,
        task_id: &str,
        inputs: HashMap<String, serde_json::Value>,
        context: &Context,
        extensions: &ExecutorExtensions,
    ) -> Result<HashMap<String, serde_json::Value>> {
        let data: ChatHuggingFaceNodeData = match inputs.get("_data") {
            Some(data) => serde_json::from_value(data.clone())?,
            None => return Err(NodeEngineError::MissingInput("_data".to_string())),
        };

        let port_values: Inputs = inputs
            .iter()
            .filter(|(port, _)| !port.starts_with('_'))
            .filter_map(|(port, value)| DataValue::from_json(value).map(|v| (port.clone(), v)))
            .collect();

        let fallback_config;
        let config = match extensions.get::<Arc<PluginConfig>>(extension_keys::PLUGIN_CONFIG) {
            Some(config) => config.as_ref(),
            None => {
                fallback_config = plugin::default_plugin_config();
                &fallback_config
            }
        };

        let fallback_clients;
        let clients: &dyn ClientFactory =
            match extensions.get::<Arc<dyn ClientFactory>>(extension_keys::CLIENT_FACTORY) {
                Some(clients) => clients.as_ref(),
                None => {
                    fallback_clients = HfClientFactory::new();
                    &fallback_clients
                }
            };

        let execution_id = extensions
            .get::<String>(extension_keys::EXECUTION_ID)
            .map(String::as_str)
            .unwrap_or_default();

        let mut ctx = ProcessContext::new(task_id, execution_id, PLUGIN_ID, config)
            .with_graph_context(context);
        if let Some(sink) = extensions.get::<Arc<dyn EventSink>>(extension_keys::EVENT_SINK) {
            ctx = ctx.with_events(sink.as_ref());
        }

        let outputs = ChatHuggingFaceNode::process(&data, &port_values, &ctx, clients).await?;
        Ok(outputs.into_iter().map(|(port, value)| (port, value.to_json())).collect())
    }
}

/// graph-flow task running a chat node
///
/// # Inputs (from context)
/// - `{task_id}.meta.data` - Node data (defaults when absent)
/// - `{task_id}.meta.execution_id` (optional) - Run identifier for stream events
/// - `{task_id}.input.{port}` - Port values, tagged or bare JSON
///
/// # Outputs (to context)
/// - `{task_id}.stream.output` - Text generated so far, updated per token
/// - `{task_id}.output.output` - Generated text
#[derive(Clone)]
pub struct ChatHuggingFaceTask {
    task_id: String,
    config: Arc<PluginConfig>,
    clients: Arc<dyn ClientFactory>,
    events: Option<Arc<dyn EventSink>>,
}

impl ChatHuggingFaceTask {
    /// Task talking to the public inference API with the default plugin config
    pub fn new(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            config: Arc::new(plugin::default_plugin_config()),
            clients: Arc::new(HfClientFactory::new()),
            events: None,
        }
    }

    pub fn with_config(mut self, config: Arc<PluginConfig>) -> Self {
        self.config = config;
        self
    }

    pub fn with_clients(mut self, clients: Arc<dyn ClientFactory>) -> Self {
        self.clients = clients;
        self
    }

    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = Some(events);
        self
    }

    /// Get the task ID
    pub fn task_id(&self) -> &str {
        &self.task_id
    }
}

#[async_trait]
impl Task for ChatHuggingFaceTask {
    fn id(&self) -> &str {
        &self.task_id
    }

    async fn run(&self, context: Context) -> graph_flow::Result<TaskResult> {
        let data_key = ContextKeys::meta(&self.task_id, "data");
        let stored: Option<serde_json::Value> = context.get(&data_key).await;
        let data: ChatHuggingFaceNodeData = match stored {
            Some(value) => serde_json::from_value(value)
                .map_err(|e| NodeEngineError::Serialization(e).into_graph_flow())?,
            None => ChatHuggingFaceNodeData::default(),
        };
        let execution_id: String = context
            .get(&ContextKeys::meta(&self.task_id, "execution_id"))
            .await
            .unwrap_or_default();

        let mut inputs = Inputs::new();
        for port in ChatHuggingFaceNode::consumed_ports(&data) {
            let value: Option<serde_json::Value> =
                context.get(&ContextKeys::input(&self.task_id, &port)).await;
            if let Some(value) = value.as_ref().and_then(DataValue::from_json) {
                inputs.insert(port, value);
            }
        }

        let mut ctx = ProcessContext::new(&self.task_id, &execution_id, PLUGIN_ID, &self.config)
            .with_graph_context(&context);
        if let Some(sink) = &self.events {
            ctx = ctx.with_events(sink.as_ref());
        }

        let outputs = ChatHuggingFaceNode::process(&data, &inputs, &ctx, self.clients.as_ref())
            .await
            .map_err(NodeEngineError::into_graph_flow)?;

        let text = match outputs.get(ChatHuggingFaceNode::PORT_OUTPUT) {
            Some(DataValue::String(text)) => text.clone(),
            _ => String::new(),
        };

        let output_key = ContextKeys::output(&self.task_id, ChatHuggingFaceNode::PORT_OUTPUT);
        context.set(&output_key, text.clone()).await;

        log::debug!(
            "ChatHuggingFaceTask {}: stored {} chars at '{}'",
            self.task_id,
            text.len(),
            output_key
        );

        Ok(TaskResult::new(Some(text), NextAction::Continue))
    }
}
