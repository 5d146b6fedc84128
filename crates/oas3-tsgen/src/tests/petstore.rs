use serde_json::Value;

use crate::generator::{
  ast::{GeneratedType, TypeOrigin},
  orchestrator::{GeneratedOutput, Orchestrator},
};

const PETSTORE: &str = include_str!("../../fixtures/petstore.json");

fn generate() -> GeneratedOutput {
  let root: Value = serde_json::from_str(PETSTORE).unwrap();
  Orchestrator::from_value(root).unwrap().generate()
}

fn declaration<'a>(output: &'a GeneratedOutput, name: &str) -> &'a GeneratedType {
  output
    .types
    .iter()
    .find(|generated| generated.name == name)
    .unwrap_or_else(|| panic!("no declaration named {name}"))
}

#[test]
fn test_declaration_order() {
  let output = generate();
  let names: Vec<&str> = output.types.iter().map(|generated| generated.name.as_str()).collect();
  assert_eq!(
    names,
    vec![
      "Pet",
      "NewPet",
      "PetStatus",
      "Pets",
      "Owner",
      "Email",
      "Phone",
      "Labels",
      "Error",
      "ListPetsQueryParams",
      "ListPetsResponse200",
      "ListPetsResponseDefault",
      "CreatePetsRequestBody",
      "CreatePetsResponseDefault",
      "ShowPetByIdPathParams",
      "ShowPetByIdResponse200",
      "DeletePetsByPetIdPathParams",
      "DeletePetsByPetIdHeaderParams",
      "UploadPhotoPathParams",
      "UploadPhotoResponse200",
    ]
  );
}

#[test]
fn test_statistics() {
  let stats = generate().stats;
  assert_eq!(stats.types_generated, 20);
  assert_eq!(stats.schema_types_generated, 9);
  assert_eq!(stats.operation_types_generated, 11);
  assert_eq!(stats.operations_converted, 5);
  assert!(stats.warnings.is_empty(), "unexpected warnings: {:?}", stats.warnings);
}

#[test]
fn test_schema_declarations() {
  let output = generate();

  assert_eq!(
    declaration(&output, "Pet").to_declaration(),
    "/**\n * A pet for sale.\n */\nexport type Pet = NewPet & {\n  id: number;\n};"
  );
  assert_eq!(
    declaration(&output, "NewPet").to_declaration(),
    "export type NewPet = {\n  name: string;\n  tag?: string | null;\n  status?: PetStatus;\n  owner?: Owner;\n};"
  );
  assert_eq!(
    declaration(&output, "PetStatus").to_declaration(),
    r#"export type PetStatus = "available" | "pending" | "sold";"#
  );
  assert_eq!(declaration(&output, "Pets").to_declaration(), "export type Pets = Pet[];");
  assert_eq!(
    declaration(&output, "Owner").to_declaration(),
    "export type Owner = {\n  name?: string;\n  pets?: Pet[];\n  contact?: Email | Phone;\n};"
  );
  assert_eq!(
    declaration(&output, "Labels").to_declaration(),
    "export type Labels = {\n  [key: string]: string;\n};"
  );
  assert_eq!(
    declaration(&output, "Error").to_declaration(),
    "export type Error = {\n  code: number;\n  message: string;\n};"
  );
}

#[test]
fn test_mutually_recursive_schemas_use_named_references() {
  let output = generate();
  assert_eq!(declaration(&output, "Pet").ty.referenced_names(), vec!["NewPet"]);
  assert_eq!(declaration(&output, "NewPet").ty.referenced_names(), vec!["PetStatus", "Owner"]);
  assert_eq!(declaration(&output, "Owner").ty.referenced_names(), vec!["Pet", "Email", "Phone"]);
}

#[test]
fn test_operation_declarations() {
  let output = generate();

  assert_eq!(
    declaration(&output, "ListPetsQueryParams").ty.to_string(),
    "{\n  /** How many items to return at one time (max 100) */\n  limit?: number;\n  status?: PetStatus;\n}"
  );
  assert_eq!(declaration(&output, "ListPetsResponse200").ty.to_string(), "Pets");
  assert_eq!(declaration(&output, "ListPetsResponseDefault").ty.to_string(), "Error");
  assert_eq!(declaration(&output, "CreatePetsRequestBody").ty.to_string(), "NewPet");
  assert_eq!(declaration(&output, "ShowPetByIdResponse200").ty.to_string(), "Pet");
  assert_eq!(
    declaration(&output, "ShowPetByIdPathParams").ty.to_string(),
    "{\n  /** The id of the pet */\n  petId: string;\n}"
  );
  assert_eq!(
    declaration(&output, "DeletePetsByPetIdHeaderParams").ty.to_string(),
    "{\n  \"X-Api-Key\": string;\n}"
  );
  assert_eq!(
    declaration(&output, "UploadPhotoResponse200").ty.to_string(),
    "{\n  url?: string;\n}"
  );
}

#[test]
fn test_non_json_request_body_is_skipped() {
  let output = generate();
  let upload = output
    .operations
    .iter()
    .find(|operation| operation.base_name == "UploadPhoto")
    .unwrap();
  assert_eq!(upload.request_body, None);
  assert!(output.types.iter().all(|generated| generated.name != "UploadPhotoRequestBody"));
}

#[test]
fn test_operation_origin_and_docs() {
  let output = generate();
  let delete = declaration(&output, "DeletePetsByPetIdPathParams");
  assert_eq!(
    delete.origin,
    TypeOrigin::Operation {
      method: "delete".to_string(),
      path: "/pets/{petId}".to_string(),
    }
  );
  assert!(delete.docs.deprecated);

  let list = declaration(&output, "ListPetsResponse200");
  assert_eq!(list.docs.summary.as_deref(), Some("Response 200 of `GET /pets`"));
  assert_eq!(list.docs.description.as_deref(), Some("List all pets"));
}

#[test]
fn test_generation_is_deterministic() {
  let root: Value = serde_json::from_str(PETSTORE).unwrap();
  let orchestrator = Orchestrator::from_value(root).unwrap();
  let first = orchestrator.generate_with_header("petstore.json");
  let second = orchestrator.generate_with_header("petstore.json");
  assert_eq!(first.code, second.code);
  assert!(first.code.contains(" * Swagger Petstore\n"));
  assert!(first.code.contains("\n\nexport type NewPet = {\n"));
}
