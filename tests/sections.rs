//! End-to-end parsing through the public API
// (c) 2024 Ross Younger

use std::ops::Deref;

use anyhow::Result;
use asterisk_config::{
    parse, parse_as, util::IntRange, Category, Coerced, Coercion, FetchOptions, Loader,
    MissingAttribute, Section, Shaped,
};

const DATA_TYPES: &str = "\
[cat1]
int_val => 10
array_val => i0,i1,i2
range_val => 25-48
multi_int_val => 100
multi_int_val => 200
multi_range_val => 1-24
multi_range_val => 25-48
multi_array_val => 1,2,3
multi_array_val => 4,5,6
";

#[test]
fn data_type_coercion() -> Result<()> {
    let sections = parse(DATA_TYPES);
    let cat = &sections["cat1"];

    assert_eq!(cat.get("int_val", Coercion::None)?, Coerced::Raw("10".into()));
    assert_eq!(cat.get("int_val", Coercion::Int)?, Coerced::Int(Shaped::One(10)));

    assert_eq!(cat.raw("array_val")?.to_string(), "i0,i1,i2");
    assert_eq!(cat.array("array_val")?, vec!["i0", "i1", "i2"]);

    assert_eq!(cat.raw("range_val")?.to_string(), "25-48");
    assert_eq!(
        cat.range("range_val")?,
        Shaped::One(Some(IntRange::new(25, 48)))
    );

    assert_eq!(cat.int("multi_int_val")?, Shaped::Many(vec![100, 200]));
    assert_eq!(
        cat.range("multi_range_val")?,
        Shaped::Many(vec![
            Some(IntRange::new(1, 24)),
            Some(IntRange::new(25, 48))
        ])
    );
    assert_eq!(
        cat.array("multi_array_val")?,
        vec!["1", "2", "3", "4", "5", "6"]
    );
    Ok(())
}

#[test]
fn repeated_keys_accumulate() -> Result<()> {
    let sections = parse("[cat1]\nattr1 => foo\nattr2 => bar\nattr2 => piyo\nattr3 => qux\nattr2 => hige\n");
    let cat = &sections["cat1"];
    assert_eq!(cat.raw("attr1")?, &"foo".into());
    assert_eq!(
        cat.raw("attr2")?,
        &vec!["bar".to_string(), "piyo".into(), "hige".into()].into()
    );
    assert_eq!(cat.raw("attr3")?, &"qux".into());
    Ok(())
}

#[test]
fn missing_attribute_names_both_parts() {
    let sections = parse("[general]\nfoo => 1\n");
    let err = sections["general"].get("bar", Coercion::Int).unwrap_err();
    assert_eq!(
        err,
        MissingAttribute {
            category: "general".into(),
            key: "bar".into()
        }
    );
}

/// A domain-specific section, as a consumer of the crate might write
#[derive(Debug)]
struct Ss7Host(Category);

impl Section for Ss7Host {
    fn new(name: &str) -> Self {
        Self(Category::new(name))
    }
    fn name(&self) -> &str {
        self.0.name()
    }
    fn add_attribute(&mut self, raw_name: &str, value: &str) {
        self.0.add_attribute(raw_name, value);
    }
}

impl Deref for Ss7Host {
    type Target = Category;
    fn deref(&self) -> &Category {
        &self.0
    }
}

impl Ss7Host {
    fn links(&self) -> Vec<String> {
        self.array("links").unwrap_or_default()
    }
}

#[test]
fn custom_section_type() {
    let sections = parse_as::<Ss7Host>(
        "; media gateways\n[host-cm-mg2]\nLinks => l1,l2\nlinks => l3\nopc => 0x1234\n\n[host-cm-mg3]\n",
    );
    assert_eq!(sections.len(), 2);
    let mg2 = &sections["host-cm-mg2"];
    assert_eq!(mg2.links(), vec!["l1", "l2", "l3"]);
    assert_eq!(mg2.int("opc").unwrap(), Shaped::One(0));
    assert!(sections["host-cm-mg3"].links().is_empty());
}

#[tokio::test]
async fn load_from_disk() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("ss7.conf");
    std::fs::write(&path, "[linkset-a]\r\ncics => 1-31\r\ncics => bogus\r\n")?;

    let loader = Loader::new(&path.to_string_lossy(), FetchOptions::default());
    let sections = loader.load_with(Ss7Host::new).await?;
    assert_eq!(
        sections["linkset-a"].range("cics")?,
        Shaped::Many(vec![Some(IntRange::new(1, 31)), None])
    );
    Ok(())
}
