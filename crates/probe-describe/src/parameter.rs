//! Container parameters.
//!
//! Parameters are plain values rather than subjects, so they are rendered
//! here directly for each [`Format`] instead of through a [`Renderer`].
//!
//! [`Renderer`]: crate::Renderer

use std::collections::BTreeMap;
use std::fmt::Write;

use serde::Serialize;
use serde::ser::Serializer;

use probe_model::Value;

use crate::error::DescribeError;
use crate::json::{JsonValue, write_data};
use crate::options::{DescribeOptions, Format};
use crate::sink::{Sink, WriteMode};
use crate::text::{write_table, write_title};
use crate::value::format_value;
use crate::xml::XmlDocument;

const HEADERS: [&str; 2] = ["Parameter", "Value"];

/// Describe the parameter `key` holding `value`.
///
/// # Errors
///
/// Returns an error if writing to the sink fails.
pub fn describe_parameter(
    out: &mut dyn Sink,
    key: &str,
    value: &Value,
    options: &DescribeOptions,
) -> Result<(), DescribeError> {
    tracing::debug!(parameter = key, format = %options.format, "Describing parameter");

    match options.format {
        Format::Text => {
            let rows = [vec![key.to_owned(), format_value(value)]];
            write_table(out, &HEADERS, &rows)
        }
        Format::Json => write_data(out, &JsonParameters(std::iter::once((key, value))), options),
        Format::Xml => {
            let mut doc = XmlDocument::new()?;
            doc.text_element("parameter", &[("key", key)], &format_value(value))?;
            doc.finish(out)
        }
        Format::Markdown => {
            let underline = "=".repeat(key.chars().count());
            let content = format!("{key}\n{underline}\n\n{}\n", format_value(value));
            out.write(&content, WriteMode::Raw)?;
            Ok(())
        }
    }
}

/// Describe every parameter, sorted by key.
///
/// # Errors
///
/// Returns an error if writing to the sink fails.
pub fn describe_parameters(
    out: &mut dyn Sink,
    parameters: &BTreeMap<String, Value>,
    options: &DescribeOptions,
) -> Result<(), DescribeError> {
    tracing::debug!(count = parameters.len(), format = %options.format, "Describing parameters");

    match options.format {
        Format::Text => {
            write_title(out, "Container Parameters")?;
            let rows: Vec<Vec<String>> = parameters
                .iter()
                .map(|(key, value)| vec![key.clone(), format_value(value)])
                .collect();
            write_table(out, &HEADERS, &rows)
        }
        Format::Json => write_data(
            out,
            &JsonParameters(parameters.iter().map(|(key, value)| (key.as_str(), value))),
            options,
        ),
        Format::Xml => {
            let mut doc = XmlDocument::new()?;
            if parameters.is_empty() {
                doc.empty("parameters", &[])?;
            } else {
                doc.start("parameters", &[])?;
                for (key, value) in parameters {
                    doc.text_element("parameter", &[("key", key.as_str())], &format_value(value))?;
                }
                doc.end("parameters")?;
            }
            doc.finish(out)
        }
        Format::Markdown => {
            let mut content = String::from("Container parameters\n====================\n");
            for (key, value) in parameters {
                write!(content, "\n- `{key}`: `{}`", format_value(value)).unwrap();
            }
            content.push('\n');
            out.write(&content, WriteMode::Raw)?;
            Ok(())
        }
    }
}

/// Serializes `(key, value)` pairs as one JSON object.
struct JsonParameters<I>(I);

impl<'a, I> Serialize for JsonParameters<I>
where
    I: Iterator<Item = (&'a str, &'a Value)> + Clone,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.clone().map(|(key, value)| (key, JsonValue(value))))
    }
}
