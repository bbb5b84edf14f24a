use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs;
use std::io::Write;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

const CATALOG: &str = r#"<catalog>
  <item sku="a1"><name>Lamp</name><qty>3</qty></item>
  <item sku="b2"><name>Desk</name><qty>1.0</qty></item>
</catalog>"#;

/// Runs the xq binary with an isolated HOME so no user config leaks in.
fn xq_in(home: &TempDir, args: &[&str], stdin: Option<&[u8]>) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_xq"));
    command
        .args(args)
        .env("HOME", home.path())
        .env_remove("XQ_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    match stdin {
        Some(_) => command.stdin(Stdio::piped()),
        None => command.stdin(Stdio::null()),
    };

    let mut child = command.spawn().expect("Failed to spawn xq");
    if let Some(input) = stdin {
        let mut pipe = child.stdin.take().expect("stdin should be piped");
        // xq may exit on a usage error before reading anything.
        let _ = pipe.write_all(input);
    }
    child.wait_with_output().expect("Failed to wait for xq")
}

fn xq(args: &[&str], stdin: Option<&[u8]>) -> Output {
    let home = TempDir::new().expect("Failed to create temp dir");
    xq_in(&home, args, stdin)
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_neither_flag_is_usage_error() {
    let output = xq(&[], Some(CATALOG.as_bytes()));

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(stderr_of(&output).contains("Please indicate an XPath expression"));
}

#[test]
fn test_both_flags_is_usage_error() {
    let output = xq(&["-f", "//item", "-e", "count(//item)"], Some(CATALOG.as_bytes()));

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("Please indicate either --find or --exec, but not both"));
}

#[test]
fn test_usage_error_without_input() {
    let output = xq(&[], None);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_unknown_flag_exits_with_one() {
    let output = xq(&["--bogus"], Some(CATALOG.as_bytes()));
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_find_element() {
    let output = xq(&["--find", "//item[@sku='a1']"], Some(CATALOG.as_bytes()));

    assert!(output.status.success());
    assert_eq!(
        stdout_of(&output),
        "<item sku=\"a1\"><name>Lamp</name><qty>3</qty></item>\n"
    );
}

#[test]
fn test_find_text() {
    let output = xq(&["-f", "//item/name/text()"], Some(CATALOG.as_bytes()));

    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "Lamp\nDesk\n");
}

#[test]
fn test_find_attribute() {
    let output = xq(&["-f", "//item/@sku"], Some(CATALOG.as_bytes()));
    assert_eq!(stdout_of(&output), "a1\nb2\n");
}

#[test]
fn test_exec_boolean() {
    let output = xq(&["--exec", "count(//item) = 2"], Some(CATALOG.as_bytes()));

    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "true\n");
}

#[test]
fn test_exec_number_without_trailing_zeros() {
    let output = xq(&["-e", "number(//item[2]/qty) * 3"], Some(CATALOG.as_bytes()));
    assert_eq!(stdout_of(&output), "3\n");
}

#[test]
fn test_exec_sum() {
    let output = xq(&["-e", "sum(//qty)"], Some(CATALOG.as_bytes()));
    assert_eq!(stdout_of(&output), "4\n");
}

#[test]
fn test_exec_nodeset() {
    let output = xq(&["-e", "//name"], Some(CATALOG.as_bytes()));
    assert_eq!(stdout_of(&output), "<name>Lamp</name>\n<name>Desk</name>\n");
}

#[test]
fn test_malformed_xml_is_parse_error() {
    let output = xq(&["-e", "count(//item)"], Some(b"<catalog><item></catalog>".as_slice()));

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(stderr_of(&output).starts_with("Unable to parse XML: "));
}

#[test]
fn test_invalid_find_query() {
    let output = xq(&["-f", "//item["], Some(CATALOG.as_bytes()));

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).starts_with("Invalid query: "));
}

#[test]
fn test_invalid_exec_expression() {
    let output = xq(&["-e", "count(("], Some(CATALOG.as_bytes()));

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).starts_with("Invalid xpath expression: "));
}

#[test]
fn test_no_input_produces_no_output() {
    let output = xq(&["-f", "//item"], None);

    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());
    assert!(output.stderr.is_empty());
}

#[test]
fn test_empty_input_is_an_empty_document() {
    let output = xq(&["-e", "1 + 1"], Some(b"".as_slice()));
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_of(&output), "2\n");

    let output = xq(&["-e", "count(//item)"], Some(b"".as_slice()));
    assert_eq!(stdout_of(&output), "0\n");

    let output = xq(&["-f", "//item"], Some(b"".as_slice()));
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_empty_input_with_invalid_expression() {
    let output = xq(&["-e", "count(("], Some(b"".as_slice()));

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).starts_with("Invalid xpath expression: "));
}

#[test]
fn test_whitespace_input_with_invalid_query() {
    let output = xq(&["-f", "//item["], Some(b"  \n\t\n".as_slice()));

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).starts_with("Invalid query: "));
}

#[test]
fn test_declared_latin1_input() {
    let xml = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><a>caf\xe9</a>";
    let output = xq(&["-e", "string(/a)"], Some(xml.as_slice()));

    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "caf\u{e9}\n");
}

#[test]
fn test_unsupported_encoding_is_parse_error() {
    let xml = b"<?xml version=\"1.0\" encoding=\"X-NO-SUCH\"?><a/>";
    let output = xq(&["-e", "1"], Some(xml.as_slice()));

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stderr_of(&output),
        "Unable to parse XML: unsupported encoding: X-NO-SUCH\n"
    );
}

#[test]
fn test_find_processing_instruction() {
    let output = xq(
        &["-f", "//processing-instruction()"],
        Some(b"<a><?render fast?></a>".as_slice()),
    );

    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "<?render fast?>\n");
}

#[test]
fn test_find_namespace_node() {
    let output = xq(
        &["-f", "/a/namespace::*[. = 'urn:p']"],
        Some(br#"<a xmlns:p="urn:p"/>"#.as_slice()),
    );

    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "urn:p\n");
}

#[test]
fn test_exec_namespaced_attribute_carries_declaration() {
    let output = xq(
        &["-n", "p=urn:p", "-e", "//@p:x"],
        Some(br#"<a xmlns:p="urn:p" p:x="1"/>"#.as_slice()),
    );

    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "p:x=\"1\" xmlns:p=\"urn:p\"\n");
}

#[test]
fn test_gzip_input() {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(CATALOG.as_bytes()).unwrap();
    let compressed = encoder.finish().unwrap();

    let output = xq(&["-e", "count(//item)"], Some(compressed.as_slice()));

    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "2\n");
}

#[test]
fn test_namespace_flag() {
    let xml = br#"<feed xmlns="http://www.w3.org/2005/Atom"><title>News</title></feed>"#;
    let output = xq(
        &["-n", "atom=http://www.w3.org/2005/Atom", "-f", "/atom:feed/atom:title/text()"],
        Some(xml.as_slice()),
    );

    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "News\n");
}

#[test]
fn test_malformed_namespace_flag() {
    let output = xq(&["-n", "atom", "-f", "//x"], Some(CATALOG.as_bytes()));
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_namespace_from_config_file() {
    let home = TempDir::new().expect("Failed to create temp dir");
    let config_dir = home.path().join(".config").join("xq");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        "[namespaces]\nsvg = \"http://www.w3.org/2000/svg\"\n",
    )
    .unwrap();

    let xml = br#"<svg xmlns="http://www.w3.org/2000/svg"><rect/><rect/></svg>"#;
    let output = xq_in(&home, &["-e", "count(//svg:rect)"], Some(xml.as_slice()));

    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "2\n");
}
