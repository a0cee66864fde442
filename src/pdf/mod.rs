pub mod reader;
pub mod writer;

use lopdf::{Dictionary, Document, Object};

/// 壊れたページツリーの循環対策として辿るParentの上限。
const MAX_PAGE_TREE_DEPTH: usize = 64;

/// ページの継承可能属性を解決する。
///
/// ページ自身の値があればそれを、無ければParentチェーン上で最も近い祖先の値を返す。
/// 値が間接参照でもそのまま返す（解決は呼び出し側）。
pub(crate) fn inherited_attribute<'a>(
    doc: &'a Document,
    page_dict: &'a Dictionary,
    key: &[u8],
) -> crate::error::Result<Option<&'a Object>> {
    if let Ok(value) = page_dict.get(key) {
        return Ok(Some(value));
    }

    let mut current = page_dict.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;
    while let Some(node_id) = current {
        depth += 1;
        if depth > MAX_PAGE_TREE_DEPTH {
            break;
        }
        let node = doc.get_dictionary(node_id)?;
        if let Ok(value) = node.get(key) {
            return Ok(Some(value));
        }
        current = node.get(b"Parent").and_then(Object::as_reference).ok();
    }
    Ok(None)
}

/// 直接辞書か、辞書への間接参照を辞書として取り出す。
pub(crate) fn resolve_dict<'a>(
    doc: &'a Document,
    obj: &'a Object,
) -> crate::error::Result<Option<&'a Dictionary>> {
    match obj {
        Object::Dictionary(d) => Ok(Some(d)),
        Object::Reference(id) => Ok(Some(doc.get_dictionary(*id)?)),
        _ => Ok(None),
    }
}
