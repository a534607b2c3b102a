use alloc::string::String;
use alloc::vec;

use crate::document::{Node, NodeData};
use crate::{
    yaml_emitter_emit, Document, Emitter, EmitterError, Encoding, Event,
    DEFAULT_MAPPING_TAG, DEFAULT_SCALAR_TAG, DEFAULT_SEQUENCE_TAG,
};

/// Start a YAML stream.
///
/// This function should be used before [`yaml_emitter_dump`] is called.
pub fn yaml_emitter_open(emitter: &mut Emitter) -> Result<(), EmitterError> {
    assert!(!emitter.opened);
    yaml_emitter_emit(emitter, Event::stream_start(Encoding::Any))?;
    emitter.opened = true;
    Ok(())
}

/// Finish a YAML stream.
///
/// This function should be used after [`yaml_emitter_dump`] is called.
pub fn yaml_emitter_close(emitter: &mut Emitter) -> Result<(), EmitterError> {
    assert!(emitter.opened);
    if emitter.closed {
        return Ok(());
    }
    yaml_emitter_emit(emitter, Event::stream_end())?;
    emitter.closed = true;
    Ok(())
}

/// Emit a YAML document.
///
/// The document object may be produced by [`crate::Document::load`]. The
/// emitter takes ownership of the document's nodes and clears them once the
/// document has been emitted, even if emission fails partway through.
pub fn yaml_emitter_dump(emitter: &mut Emitter, document: &mut Document) -> Result<(), EmitterError> {
    if !emitter.opened {
        if let Err(error) = yaml_emitter_open(emitter) {
            delete_document_and_anchors(emitter, document);
            return Err(error);
        }
    }
    if document.nodes.is_empty() {
        yaml_emitter_close(emitter)?;
    } else {
        assert!(emitter.opened);
        emitter.anchors = vec![Default::default(); document.nodes.len()];
        let result = (|| -> Result<(), EmitterError> {
            yaml_emitter_emit(
                emitter,
                Event::document_start(
                    document.version_directive,
                    &core::mem::take(&mut document.tag_directives),
                    document.start_implicit,
                ),
            )?;
            anchor_node(emitter, document, 1);
            dump_node(emitter, document, 1)?;
            yaml_emitter_emit(emitter, Event::document_end(document.end_implicit))
        })();
        delete_document_and_anchors(emitter, document);
        return result;
    }

    delete_document_and_anchors(emitter, document);
    Ok(())
}

fn delete_document_and_anchors(emitter: &mut Emitter, document: &mut Document) {
    if emitter.anchors.is_empty() {
        document.nodes.clear();
        document.version_directive = None;
        document.tag_directives.clear();
        return;
    }

    document.nodes.clear();
    emitter.anchors.clear();
    emitter.last_anchor_id = 0;
}

fn anchor_node_sub(emitter: &mut Emitter, index: i32) {
    emitter.anchors[index as usize - 1].references += 1;
    if emitter.anchors[index as usize - 1].references == 2 {
        emitter.last_anchor_id += 1;
        emitter.anchors[index as usize - 1].anchor = emitter.last_anchor_id;
        log::trace!("dumper: assigned anchor id{:03} to node {index}", emitter.last_anchor_id);
    }
}

fn anchor_node(emitter: &mut Emitter, document: &Document, index: i32) {
    let node = &document.nodes[index as usize - 1];
    emitter.anchors[index as usize - 1].references += 1;
    if emitter.anchors[index as usize - 1].references == 1 {
        match &node.data {
            NodeData::Sequence { items, .. } => {
                for item in items.iter() {
                    anchor_node_sub(emitter, *item);
                }
            }
            NodeData::Mapping { pairs, .. } => {
                for pair in pairs.iter() {
                    anchor_node_sub(emitter, pair.key);
                    anchor_node_sub(emitter, pair.value);
                }
            }
            _ => {}
        }
    } else if emitter.anchors[index as usize - 1].references == 2 {
        emitter.last_anchor_id += 1;
        emitter.anchors[index as usize - 1].anchor = emitter.last_anchor_id;
    }
}

fn generate_anchor(anchor_id: i32) -> String {
    alloc::format!("id{:03}", anchor_id)
}

fn dump_node(emitter: &mut Emitter, document: &mut Document, index: i32) -> Result<(), EmitterError> {
    let anchor_id = emitter.anchors[index as usize - 1].anchor;
    let anchor = if anchor_id != 0 {
        Some(generate_anchor(anchor_id))
    } else {
        None
    };
    if emitter.anchors[index as usize - 1].serialized {
        return dump_alias(emitter, anchor.expect("serialized node always has an anchor"));
    }
    emitter.anchors[index as usize - 1].serialized = true;

    let node = core::mem::take(&mut document.nodes[index as usize - 1]);
    match node.data {
        NodeData::Scalar { .. } => dump_scalar(emitter, node, anchor),
        NodeData::Sequence { .. } => dump_sequence(emitter, document, node, anchor),
        NodeData::Mapping { .. } => dump_mapping(emitter, document, node, anchor),
        NodeData::NoNode => unreachable!("empty node should never reach the dumper"),
    }
}

fn dump_alias(emitter: &mut Emitter, anchor: String) -> Result<(), EmitterError> {
    yaml_emitter_emit(emitter, Event::alias(&anchor))
}

fn dump_scalar(emitter: &mut Emitter, node: Node, anchor: Option<String>) -> Result<(), EmitterError> {
    let plain_implicit = node.tag.as_deref() == Some(DEFAULT_SCALAR_TAG);
    let quoted_implicit = node.tag.as_deref() == Some(DEFAULT_SCALAR_TAG);

    let NodeData::Scalar { value, style } = node.data else {
        unreachable!()
    };
    yaml_emitter_emit(
        emitter,
        Event::scalar(
            anchor.as_deref(),
            node.tag.as_deref(),
            &value,
            plain_implicit,
            quoted_implicit,
            style,
        ),
    )
}

fn dump_sequence(
    emitter: &mut Emitter,
    document: &mut Document,
    node: Node,
    anchor: Option<String>,
) -> Result<(), EmitterError> {
    let implicit = node.tag.as_deref() == Some(DEFAULT_SEQUENCE_TAG);

    let NodeData::Sequence { items, style } = node.data else {
        unreachable!()
    };
    yaml_emitter_emit(
        emitter,
        Event::sequence_start(anchor.as_deref(), node.tag.as_deref(), implicit, style),
    )?;
    for item in items {
        dump_node(emitter, document, item)?;
    }
    yaml_emitter_emit(emitter, Event::sequence_end())
}

fn dump_mapping(
    emitter: &mut Emitter,
    document: &mut Document,
    node: Node,
    anchor: Option<String>,
) -> Result<(), EmitterError> {
    let implicit = node.tag.as_deref() == Some(DEFAULT_MAPPING_TAG);

    let NodeData::Mapping { pairs, style } = node.data else {
        unreachable!()
    };
    yaml_emitter_emit(
        emitter,
        Event::mapping_start(anchor.as_deref(), node.tag.as_deref(), implicit, style),
    )?;
    for pair in pairs {
        dump_node(emitter, document, pair.key)?;
        dump_node(emitter, document, pair.value)?;
    }
    yaml_emitter_emit(emitter, Event::mapping_end())
}
