use crate::conversation::{self, TranslationRequest, Turn};
use crate::error::ConversationError;
use crate::schema::Schema;

/// Appended to the final user turn of every request prompt.
const FORMAT_INSTRUCTION: &str = "Answer my request translated into a JSON object \
with 2 spaces of indentation and no properties with the value undefined";

fn schema_preamble(schema: &Schema) -> String {
    format!(
        "You are a service that translates user requests into JSON objects of type {} \
according to the following TypeScript definitions:\n```\n{}```\n",
        schema.type_name(),
        schema.source()
    )
}

fn frame_request(text: &str) -> String {
    format!("The following is my request:\n\"\"\"\n{text}\n\"\"\"\n")
}

/// Build the chat-mode prompt: one system turn carrying the literal schema
/// source and target type name, then the request folded into user/assistant
/// turns with the JSON formatting instruction on the final user turn.
///
/// List-form requests are checked against the shape invariant first; a
/// violation rejects the request before anything is sent.
pub fn build_request_prompt(
    request: &TranslationRequest,
    schema: &Schema,
) -> Result<Vec<Turn>, ConversationError> {
    let mut prompt = vec![Turn::system(schema_preamble(schema))];

    match request {
        TranslationRequest::Text(text) => {
            prompt.push(Turn::user(format!(
                "{}{FORMAT_INSTRUCTION}",
                frame_request(text)
            )));
        }
        TranslationRequest::Turns(turns) => {
            conversation::check_shape(turns)?;
            for (index, turn) in turns.iter().enumerate() {
                if index == 0 {
                    prompt.push(Turn::user(frame_request(&turn.text)));
                } else {
                    prompt.push(turn.clone());
                }
            }
            if let Some(last) = prompt.last_mut() {
                last.text.push(' ');
                last.text.push_str(FORMAT_INSTRUCTION);
            }
        }
    }

    Ok(prompt)
}

/// Flat single-string rendering for completion endpoints without a chat
/// shape. Preview only — the live completion path is chat-mode.
pub fn build_request_text(request: &str, schema: &Schema) -> String {
    format!(
        "{}The following is a user request:\n\"\"\"\n{request}\n\"\"\"\n\
The following is the user request translated into a JSON object with 2 spaces \
of indentation and no properties with the value undefined:\n",
        schema_preamble(schema)
    )
}

/// Turn a validator diagnostic into the follow-up that asks the model for a
/// corrected object.
pub fn build_repair_prompt(diagnostic: &str) -> String {
    format!(
        "The JSON object is invalid for the following reason:\n\"\"\"\n{diagnostic}\n\"\"\"\n\
Please correct the error and provide the revised JSON object.\n"
    )
}
