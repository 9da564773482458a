//! The Input Assembler (§4.6): deterministic merge of run params, a node's
//! static config, and predecessor outputs, followed by a single
//! placeholder-substitution pass.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use weft_core::{NodeId, PortMap};
use weft_workflow::{DependencyGraph, NodeDefinition, WorkflowDefinition};

use crate::run_state::RunState;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").unwrap());

/// Default output port name a predecessor's outputs are namespaced under
/// when an edge does not bind one explicitly (§4.6 step 3).
const DEFAULT_OUTPUT_NAME: &str = "output";

/// Build the effective `inputs` map for `node`, per the 5-step merge in
/// §4.6. `state` supplies the already-recorded [`weft_execution::NodeResult`]
/// for each predecessor so only successful outputs are merged in.
#[must_use]
pub fn assemble_inputs(
    workflow: &WorkflowDefinition,
    graph: &DependencyGraph,
    node: &NodeDefinition,
    params: &PortMap,
    state: &RunState,
) -> PortMap {
    let mut inputs = params.clone();
    inputs.extend(node.config().clone());

    // An edge can rename the output a predecessor is namespaced under; collect
    // those overrides before merging so step 3 uses the bound name rather than
    // always `DEFAULT_OUTPUT_NAME`.
    let mut output_names: HashMap<&NodeId, &str> = HashMap::new();
    for edge in workflow.edges() {
        if edge.to() == node.id() {
            if let Some(source_output) = edge.source_output() {
                output_names.insert(edge.from(), source_output);
            }
        }
    }

    for predecessor_id in graph.predecessors(node.id()) {
        let output_name = output_names.get(predecessor_id).copied().unwrap_or(DEFAULT_OUTPUT_NAME);
        merge_predecessor_outputs(&mut inputs, predecessor_id, output_name, state);
    }

    for edge in workflow.edges() {
        if edge.to() != node.id() {
            continue;
        }
        if let (Some(source_output), Some(target_input)) = (edge.source_output(), edge.target_input())
        {
            if let Some(value) = predecessor_output_value(edge.from(), source_output, state) {
                inputs.insert(target_input.to_owned(), value);
            }
        }
    }

    substitute_placeholders(&mut inputs);
    inputs
}

/// Merge one predecessor's entire output map verbatim under the single key
/// `{predecessor_id}_{output_name}` (§4.6 step 3, §8 property 3). A
/// predecessor producing `{"n": 1}` contributes `inputs["a_output"] =
/// {"n": 1}`, not a flattened `inputs["a_n"] = 1`.
fn merge_predecessor_outputs(inputs: &mut PortMap, predecessor_id: &NodeId, output_name: &str, state: &RunState) {
    let Some(outputs) = state.succeeded_output(predecessor_id) else {
        return;
    };
    inputs.insert(format!("{predecessor_id}_{output_name}"), Value::Object(outputs.clone()));
}

fn predecessor_output_value(predecessor_id: &NodeId, source_output: &str, state: &RunState) -> Option<Value> {
    let outputs = state.succeeded_output(predecessor_id)?;
    let port = if source_output.is_empty() {
        DEFAULT_OUTPUT_NAME
    } else {
        source_output
    };
    outputs.get(port).cloned()
}

/// Single substitution pass over every string-typed value in `inputs`,
/// resolving `{placeholder}` against the map built so far. Undefined
/// placeholders are left as the literal text (§4.6 step 5).
fn substitute_placeholders(inputs: &mut PortMap) {
    let snapshot = inputs.clone();
    for value in inputs.values_mut() {
        if let Value::String(s) = value {
            *s = resolve(s, &snapshot);
        }
    }
}

fn resolve(template: &str, snapshot: &PortMap) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures<'_>| {
            let name = &caps[1];
            match snapshot.get(name) {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => caps[0].to_owned(),
            }
        })
        .into_owned()
}
