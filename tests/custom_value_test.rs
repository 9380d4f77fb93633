//! Integration test for custom `JsonValue` implementations
//!
//! Verifies that user types can describe their JSON shape using only the public
//! scope operations, without the writer knowing anything about them.

use std::io::Write;

use jotson::{
    ext,
    writer::{Document, JsonError, JsonValue, Node, Null, WriterSettings},
};

type TestResult = Result<(), Box<dyn std::error::Error>>;

struct Person {
    name: String,
    age: u32,
    nickname: Option<String>,
    pets: Vec<String>,
}

impl JsonValue for Person {
    fn write_json<W: Write>(&self, node: Node<'_, W>) -> Result<(), JsonError> {
        let mut obj = node.obj()?;
        obj.val("name", &self.name)?;
        obj.val("age", self.age)?;
        obj.val("nickname", self.nickname.as_deref())?;
        obj.val("pets", &self.pets)?;
        obj.end()
    }
}

fn alice() -> Person {
    Person {
        name: "Alice B.".to_owned(),
        age: 35,
        nickname: None,
        pets: vec!["Lucky".to_owned(), "Fido".to_owned(), "Goldie".to_owned()],
    }
}

#[test]
fn custom_type_as_top_level_value() -> TestResult {
    let mut document = Document::new(Vec::new());
    document.val(alice())?;

    assert_eq!(
        r#"{"name":"Alice B.","age":35,"pets":["Lucky","Fido","Goldie"]}"#,
        String::from_utf8(document.finish()?)?
    );
    Ok(())
}

#[test]
fn custom_type_as_member_and_element() -> TestResult {
    let mut document = Document::new(Vec::new());
    {
        let mut obj = document.obj()?;
        obj.val("owner", alice())?;
        let mut visitors = obj.ar("visitors")?;
        visitors.val(Person {
            name: "Bob".to_owned(),
            age: 40,
            nickname: Some("Bobby".to_owned()),
            pets: Vec::new(),
        })?;
        visitors.val(Null)?;
    }

    let json = String::from_utf8(document.finish()?)?;
    let parsed: serde_json::Value = serde_json::from_str(&json)?;
    assert_eq!("Alice B.", parsed["owner"]["name"]);
    assert_eq!("Bobby", parsed["visitors"][0]["nickname"]);
    assert_eq!(true, parsed["visitors"][1].is_null());
    Ok(())
}

#[test]
fn custom_type_pretty_printed() -> TestResult {
    let mut document = Document::new_custom(Vec::new(), WriterSettings { pretty_print: true });
    document.val(Person {
        name: "Carol".to_owned(),
        age: 28,
        nickname: None,
        pets: vec!["Rex".to_owned()],
    })?;

    let expected = concat!(
        "{\n",
        "  \"name\":\"Carol\",\n",
        "  \"age\":28,\n",
        "  \"pets\":[\n",
        "    \"Rex\"\n",
        "  ]\n",
        "}",
    );
    assert_eq!(expected, String::from_utf8(document.finish()?)?);
    Ok(())
}

#[test]
fn custom_collection_through_write_seq() -> TestResult {
    struct Ring(Vec<f64>);

    impl JsonValue for Ring {
        fn write_json<W: Write>(&self, node: Node<'_, W>) -> Result<(), JsonError> {
            ext::write_seq(node, &self.0)
        }
    }

    let mut document = Document::new(Vec::new());
    document.val(Ring(vec![1.2, 3.5, 3.4]))?;
    assert_eq!("[1.2,3.5,3.4]", String::from_utf8(document.finish()?)?);
    Ok(())
}
