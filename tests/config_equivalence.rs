//! The same logical graph under configs 0..4 decodes to identical
//! visitor event streams.

use dato::layout::{Subtype, ValueType};
use dato::length::AdaptiveConfig;
use dato::reader::{Reader, ReaderOptions};
use dato::visitor::Visitor;
use dato::writer::{EntryRef, Writer, WriterOptions};

#[derive(Default, Debug, PartialEq)]
struct RecordingVisitor {
    events: Vec<String>,
}

impl Visitor for RecordingVisitor {
    fn begin_map(&mut self, map_type: ValueType, len: u32) {
        self.events.push(format!("begin_map({:?},{})", map_type, len));
    }
    fn end_map(&mut self, map_type: ValueType) {
        self.events.push(format!("end_map({:?})", map_type));
    }
    fn begin_string_key(&mut self, key: &[u8]) {
        self.events.push(format!("begin_string_key({:?})", key));
    }
    fn begin_array(&mut self, len: u32) {
        self.events.push(format!("begin_array({})", len));
    }
    fn end_array(&mut self) {
        self.events.push("end_array".to_string());
    }
    fn on_value_u32(&mut self, value: u32) {
        self.events.push(format!("u32({})", value));
    }
    fn on_value_string8(&mut self, bytes: &[u8]) {
        self.events.push(format!("string8({:?})", bytes));
    }
    fn on_value_vector(&mut self, subtype: Subtype, elem_count: u8, data: &[u8]) {
        self.events.push(format!("vector({:?},{},{:?})", subtype, elem_count, data));
    }
}

fn build_graph(config_id: u8) -> Vec<u8> {
    let config = AdaptiveConfig::from_id(config_id).unwrap();
    let mut writer = Writer::new(config, WriterOptions::default());

    let label_key = writer.write_string_key(b"label").unwrap();
    let label_value = writer.write_string8(b"sample item").unwrap();
    let numbers_key = writer.write_string_key(b"numbers").unwrap();
    let n0 = writer.write_u32(10);
    let n1 = writer.write_u32(20);
    let n2 = writer.write_u32(30);
    let numbers_value = writer.write_array(&[n0, n1, n2]).unwrap();
    let weights_key = writer.write_string_key(b"weights").unwrap();
    let weights_value = writer.write_vector(&[1.0f32, 2.5, -3.0]).unwrap();

    let mut entries = vec![
        EntryRef::for_string_key(label_key, label_value),
        EntryRef::for_string_key(numbers_key, numbers_value),
        EntryRef::for_string_key(weights_key, weights_value),
    ];
    let root = writer.write_string_map(&mut entries).unwrap();
    writer.set_root(root);
    writer.get_data().to_vec()
}

fn walk(buf: &[u8], config_id: u8) -> RecordingVisitor {
    let config = AdaptiveConfig::from_id(config_id).unwrap();
    let reader = Reader::init(buf, config, ReaderOptions::default()).unwrap();
    let mut visitor = RecordingVisitor::default();
    reader.get_root().iterate(&mut visitor).unwrap();
    visitor
}

#[test]
fn every_preset_config_decodes_the_same_graph_identically() {
    let baseline = walk(&build_graph(0), 0);
    for config_id in 1..=4u8 {
        let buf = build_graph(config_id);
        let events = walk(&buf, config_id);
        assert_eq!(events, baseline, "config {} diverged from config 0", config_id);
    }
}
