//! Record to operation resolution.

use crate::error::ValidationError;
use crate::operation::{Operation, RecordLocator, RecordPayload};
use crate::record::{json_type_name, Action, CustomObjectRecord};
use serde_json::{Map, Value};

/// Maps records onto operations.
///
/// Resolution is pure: the same record always yields the same operation.
/// The identifying field decides the operation, first match wins:
/// `id`, then `external_id`, then `name`, then none (create).
#[derive(Debug, Clone)]
pub struct ActionResolver {
    default_action: String,
}

impl ActionResolver {
    /// `default_action` applies to records without an `action` field.
    pub fn new(default_action: impl Into<String>) -> Self {
        Self {
            default_action: default_action.into(),
        }
    }

    /// The custom object key routes the request, so an empty one is refused
    /// even when schema validation is off.
    pub fn resolve(&self, record: &CustomObjectRecord) -> Result<Operation, ValidationError> {
        if record.custom_object_key.is_empty() {
            return Err(ValidationError::MissingProperty("custom_object_key"));
        }

        let action: Action = record
            .action
            .as_deref()
            .unwrap_or(&self.default_action)
            .parse()?;

        let locator = record.locator();

        match action {
            Action::Upsert => {
                let payload = RecordPayload::new(fields_object(record)?, locator.as_ref());
                Ok(match locator {
                    Some(RecordLocator::Id(_)) => Operation::Update(payload),
                    Some(RecordLocator::ExternalId(_)) => Operation::UpsertByExternalId(payload),
                    Some(RecordLocator::Name(_)) => Operation::UpsertByName(payload),
                    None => Operation::Create(payload),
                })
            }
            Action::Delete => match locator {
                Some(RecordLocator::Id(id)) => Ok(Operation::Delete(id)),
                Some(RecordLocator::ExternalId(ext)) => Ok(Operation::DeleteByExternalId(ext)),
                Some(RecordLocator::Name(_)) | None => Err(ValidationError::DeleteRequiresIdentifier),
            },
        }
    }
}

fn fields_object(record: &CustomObjectRecord) -> Result<Map<String, Value>, ValidationError> {
    match &record.custom_object_fields {
        Some(Value::Object(fields)) => Ok(fields.clone()),
        Some(other) => Err(ValidationError::FieldsNotObject(json_type_name(other))),
        None => Err(ValidationError::MissingFields),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::OperationKind;
    use serde_json::json;

    fn record(value: Value) -> CustomObjectRecord {
        serde_json::from_value(value).unwrap()
    }

    fn resolver() -> ActionResolver {
        ActionResolver::new("upsert")
    }

    #[test]
    fn id_wins_over_every_other_identifier() {
        let rec = record(json!({
            "custom_object_key": "apt",
            "custom_object_fields": {"unit": "1A"},
            "action": "upsert",
            "id": "123",
            "external_id": "e1",
            "name": "Unit 1A"
        }));

        let op = resolver().resolve(&rec).unwrap();
        assert_eq!(op.kind(), OperationKind::Update);
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({"custom_object_fields": {"unit": "1A"}, "id": "123"})
        );
    }

    #[test]
    fn external_id_routes_to_upsert_by_external_id() {
        let rec = record(json!({
            "custom_object_key": "apt",
            "custom_object_fields": {"unit": "1A"},
            "action": "upsert",
            "external_id": "e1",
            "name": "Unit 1A"
        }));

        let op = resolver().resolve(&rec).unwrap();
        assert_eq!(op.kind(), OperationKind::UpsertByExternalId);
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({"custom_object_fields": {"unit": "1A"}, "external_id": "e1"})
        );
    }

    #[test]
    fn name_routes_to_upsert_by_name() {
        let rec = record(json!({
            "custom_object_key": "apt",
            "custom_object_fields": {},
            "name": "Unit 1A"
        }));
        assert_eq!(
            resolver().resolve(&rec).unwrap().kind(),
            OperationKind::UpsertByName
        );
    }

    #[test]
    fn no_identifier_upsert_creates() {
        let rec = record(json!({
            "custom_object_key": "apt",
            "custom_object_fields": {"unit": "2C"}
        }));
        let op = resolver().resolve(&rec).unwrap();
        assert_eq!(op.kind(), OperationKind::Create);
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({"custom_object_fields": {"unit": "2C"}})
        );
    }

    #[test]
    fn delete_by_id_and_external_id() {
        let by_id = record(json!({"custom_object_key": "apt", "action": "delete", "id": "123"}));
        assert_eq!(
            resolver().resolve(&by_id).unwrap(),
            Operation::Delete("123".to_string())
        );

        let by_ext = record(json!({
            "custom_object_key": "apt",
            "action": "delete",
            "external_id": "e1",
            "name": "ignored"
        }));
        assert_eq!(
            resolver().resolve(&by_ext).unwrap(),
            Operation::DeleteByExternalId("e1".to_string())
        );
    }

    #[test]
    fn delete_never_carries_fields() {
        let rec = record(json!({
            "custom_object_key": "apt",
            "custom_object_fields": {"unit": "1A"},
            "action": "delete",
            "id": "123"
        }));
        assert_eq!(
            serde_json::to_value(resolver().resolve(&rec).unwrap()).unwrap(),
            json!("123")
        );
    }

    #[test]
    fn delete_with_only_name_fails() {
        let rec = record(json!({"custom_object_key": "apt", "action": "delete", "name": "Unit 1A"}));
        assert_eq!(
            resolver().resolve(&rec),
            Err(ValidationError::DeleteRequiresIdentifier)
        );
    }

    #[test]
    fn delete_without_identifier_fails() {
        let rec = record(json!({"custom_object_key": "apt", "action": "delete"}));
        assert_eq!(
            resolver().resolve(&rec),
            Err(ValidationError::DeleteRequiresIdentifier)
        );
    }

    #[test]
    fn unknown_action_fails_before_routing() {
        let rec = record(json!({
            "custom_object_key": "apt",
            "custom_object_fields": {},
            "action": "insert",
            "id": "123"
        }));
        assert_eq!(
            resolver().resolve(&rec),
            Err(ValidationError::UnsupportedAction("insert".to_string()))
        );
    }

    #[test]
    fn default_action_applies_when_missing() {
        let rec = record(json!({"custom_object_key": "apt", "id": "123"}));
        assert_eq!(
            ActionResolver::new("delete").resolve(&rec).unwrap(),
            Operation::Delete("123".to_string())
        );
        assert_eq!(
            ActionResolver::new("insert").resolve(&rec),
            Err(ValidationError::UnsupportedAction("insert".to_string()))
        );
    }

    #[test]
    fn upsert_requires_object_fields() {
        let missing = record(json!({"custom_object_key": "apt", "id": "1"}));
        assert_eq!(resolver().resolve(&missing), Err(ValidationError::MissingFields));

        let scalar = record(json!({"custom_object_key": "apt", "custom_object_fields": "x"}));
        assert_eq!(
            resolver().resolve(&scalar),
            Err(ValidationError::FieldsNotObject("string"))
        );
    }

    #[test]
    fn resolution_is_repeatable() {
        let rec = record(json!({
            "custom_object_key": "apt",
            "custom_object_fields": {"unit": "1A"},
            "external_id": "e1"
        }));
        let resolver = resolver();
        assert_eq!(resolver.resolve(&rec), resolver.resolve(&rec));
    }

    #[test]
    fn empty_custom_object_key_is_rejected() {
        let rec = record(json!({
            "custom_object_key": "",
            "id": "1",
            "action": "delete"
        }));
        assert_eq!(
            resolver().resolve(&rec),
            Err(ValidationError::MissingProperty("custom_object_key"))
        );
    }
}
