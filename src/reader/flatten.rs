use crate::reader::block::Block;

/// Turns a fetched block tree into the linear sequence the renderer walks.
///
/// Container blocks (callout, toggle, columns, ...) are emitted untouched and
/// keep their nested children. Any other block is emitted without its
/// `children`, immediately followed by those children, flattened the same way.
pub fn flatten_blocks(blocks: Vec<Block>) -> Vec<Block> {
    let mut flattened = Vec::with_capacity(blocks.len());
    push_flattened(blocks, &mut flattened);
    flattened
}

fn push_flattened(blocks: Vec<Block>, out: &mut Vec<Block>) {
    for mut block in blocks {
        if block.kind.is_container() {
            out.push(block);
            continue;
        }
        let children = block.children.take();
        out.push(block);
        if let Some(children) = children {
            push_flattened(children, out);
        }
    }
}
