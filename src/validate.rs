use std::path::PathBuf;

use serde_json::Value;
use uuid::Uuid;

use crate::config::OracleConfig;
use crate::error::ValidationError;
use crate::schema::Schema;

/// Stand-in for the TypeScript standard library, small enough that the
/// oracle only sees the shapes JSON values can take.
const MINIMAL_LIB: &str = "interface Array<T> { length: number, [n: number]: T }\n\
interface Object { toString(): string }\n\
interface Function { prototype: unknown }\n\
interface CallableFunction extends Function {}\n\
interface NewableFunction extends Function {}\n\
interface String { readonly length: number }\n\
interface Boolean { valueOf(): boolean }\n\
interface Number { valueOf(): number }\n\
interface RegExp { test(string: string): boolean }";

/// Removes the per-check source artifacts no matter how the check ends.
struct ArtifactGuard {
    paths: [PathBuf; 3],
}

impl Drop for ArtifactGuard {
    fn drop(&mut self) {
        for path in &self.paths {
            let _ = std::fs::remove_file(path);
        }
    }
}

/// Recursively drop null object properties and null array elements.
fn strip_null_values(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .filter(|item| !item.is_null())
                .map(strip_null_values)
                .collect(),
        ),
        Value::Object(entries) => Value::Object(
            entries
                .into_iter()
                .filter(|(_, entry)| !entry.is_null())
                .map(|(key, entry)| (key, strip_null_values(entry)))
                .collect(),
        ),
        other => other,
    }
}

fn stage_error(error: std::io::Error) -> ValidationError {
    ValidationError::Oracle(format!("could not stage artifacts: {error}"))
}

/// Checks candidate JSON against a TypeScript schema by compiling a
/// synthesized module with an external `tsc`-style type checker.
///
/// Each check writes three sources into the scratch directory (the typed
/// candidate module, the schema, and a minimal stdlib stub), runs the
/// checker over them, and removes them again on every outcome.
pub struct SchemaValidator {
    schema: Schema,
    oracle: OracleConfig,
    strip_nulls: bool,
}

impl SchemaValidator {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            oracle: OracleConfig::default(),
            strip_nulls: false,
        }
    }

    #[must_use]
    pub fn with_oracle(mut self, oracle: OracleConfig) -> Self {
        self.oracle = oracle;
        self
    }

    /// Remove null-valued properties from candidates before the type
    /// check, for schemas that model absence as optional properties.
    #[must_use]
    pub fn with_strip_nulls(mut self, strip_nulls: bool) -> Self {
        self.strip_nulls = strip_nulls;
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Parse `json_text` and type-check it against the schema. Returns the
    /// parsed (and possibly null-stripped) value on success.
    pub async fn validate(&self, json_text: &str) -> Result<Value, ValidationError> {
        let mut candidate: Value = serde_json::from_str(json_text)?;

        if self.strip_nulls {
            candidate = strip_null_values(candidate);
        }

        self.type_check(&candidate).await?;
        Ok(candidate)
    }

    fn module_text(&self, candidate: &Value, id: &str) -> String {
        format!(
            "import {{ {type_name} }} from './schema_{id}';\nconst json: {type_name} = {candidate};",
            type_name = self.schema.type_name()
        )
    }

    async fn type_check(&self, candidate: &Value) -> Result<(), ValidationError> {
        let id = Uuid::new_v4().simple().to_string();
        let scratch = self.oracle.scratch_dir();

        tokio::fs::create_dir_all(&scratch)
            .await
            .map_err(stage_error)?;

        let json_path = scratch.join(format!("json_{id}.ts"));
        let lib_path = scratch.join(format!("lib_{id}.d.ts"));
        let schema_path = scratch.join(format!("schema_{id}.ts"));
        let _guard = ArtifactGuard {
            paths: [json_path.clone(), lib_path.clone(), schema_path.clone()],
        };

        tokio::fs::write(&json_path, self.module_text(candidate, &id))
            .await
            .map_err(stage_error)?;
        tokio::fs::write(&lib_path, MINIMAL_LIB)
            .await
            .map_err(stage_error)?;
        tokio::fs::write(&schema_path, self.schema.source())
            .await
            .map_err(stage_error)?;

        let mut command = tokio::process::Command::new(&self.oracle.command);
        command
            .arg(&json_path)
            .arg(&lib_path)
            .arg(&schema_path)
            .args(["--target", "es2021", "--lib", "es2021", "--module", "node16"])
            .args(["--esModuleInterop", "true"])
            .arg("--outDir")
            .arg(scratch.join("out"))
            .args(["--skipLibCheck", "true", "--strict", "true"])
            .args(["--exactOptionalPropertyTypes", "true", "--declaration", "true"])
            .arg("--noEmit")
            // A timed-out check must take the compiler down with it.
            .kill_on_drop(true);

        let result = tokio::time::timeout(self.oracle.timeout(), command.output()).await;

        match result {
            Ok(Ok(output)) => {
                if output.status.success() {
                    tracing::debug!(artifact = %id, type_name = self.schema.type_name(), "candidate type-checked");
                    return Ok(());
                }

                let diagnostic = String::from_utf8_lossy(&output.stdout).to_string();
                let stderr = String::from_utf8_lossy(&output.stderr);
                if !stderr.is_empty() {
                    tracing::debug!(artifact = %id, stderr = %stderr, "type checker wrote to stderr");
                }
                tracing::warn!(artifact = %id, "type check rejected candidate");
                Err(ValidationError::Schema { diagnostic })
            }
            Ok(Err(error)) => Err(ValidationError::Oracle(format!(
                "could not run {}: {error}",
                self.oracle.command
            ))),
            Err(_) => Err(ValidationError::Oracle(format!(
                "{} timed out after {}s",
                self.oracle.command, self.oracle.timeout_secs
            ))),
        }
    }
}
