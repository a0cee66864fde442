use std::collections::HashSet;
use std::path::Path;

use lopdf::{Document, Object, ObjectId};

use super::{inherited_attribute, resolve_dict};

/// PDFが許すページ一辺の最大長 (14,400 pt = 200 in)。
pub const MAX_PAGE_SIDE_PT: f64 = 14_400.0;

/// ページ分類: 画像を含むページはそのままコピー、それ以外はラスタライズ対象。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// 1つ以上の画像XObjectを参照しているページ。
    ImageBearing,
    /// 画像を含まないページ（テキスト・ベクターのみ、または空白）。
    TextLike,
}

pub struct PdfReader {
    doc: Document,
}

impl PdfReader {
    /// バイト列からPDFを読み込んでPdfReaderを作成する。
    pub fn from_bytes(bytes: &[u8]) -> crate::error::Result<Self> {
        if bytes.is_empty() {
            return Err(crate::error::DarkModeError::parse("input is empty"));
        }
        let doc = Document::load_mem(bytes)?;
        Self::from_document(doc)
    }

    /// PDFファイルを開いてPdfReaderを作成する。
    pub fn open(path: impl AsRef<Path>) -> crate::error::Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    fn from_document(doc: Document) -> crate::error::Result<Self> {
        // ページツリーを辿れない文書は読み込み失敗として扱う
        doc.catalog()
            .map_err(|e| crate::error::DarkModeError::parse(format!("missing catalog: {e}")))?;
        Ok(Self { doc })
    }

    /// 内部のlopdf Documentへの参照を返す。
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// ページ数を返す。
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// ページインデックス(0-indexed)からObjectIdを取得する。
    pub fn page_id(&self, page_index: u32) -> crate::error::Result<ObjectId> {
        let pages = self.doc.get_pages();
        pages.get(&(page_index + 1)).copied().ok_or_else(|| {
            crate::error::DarkModeError::parse(format!("page {} not found", page_index))
        })
    }

    /// 指定ページ(0-indexed)の寸法(width_pts, height_pts)をMediaBoxから求める。
    ///
    /// MediaBoxはページツリーから継承されうる。幅・高さが正でない、
    /// または14,400 pt（PDFの上限）を超える場合はエラー。
    pub fn page_dimensions(&self, page_index: u32) -> crate::error::Result<(f64, f64)> {
        let page_id = self.page_id(page_index)?;
        let page_dict = self.doc.get_dictionary(page_id)?;

        let media_box = match inherited_attribute(&self.doc, page_dict, b"MediaBox")? {
            Some(Object::Reference(id)) => self.doc.get_object(*id)?,
            Some(obj) => obj,
            None => {
                return Err(crate::error::DarkModeError::parse(format!(
                    "page {page_index} has no MediaBox"
                )));
            }
        };

        let corners = media_box
            .as_array()?
            .iter()
            .map(|obj| obj.as_float().map(f64::from))
            .collect::<std::result::Result<Vec<f64>, _>>()?;
        let [x0, y0, x1, y1] = corners[..] else {
            return Err(crate::error::DarkModeError::parse(format!(
                "MediaBox must have 4 numbers, got {}",
                corners.len()
            )));
        };

        let (width, height) = ((x1 - x0).abs(), (y1 - y0).abs());
        if width <= 0.0 || height <= 0.0 {
            return Err(crate::error::DarkModeError::parse(format!(
                "page {page_index} has an empty MediaBox ({width} x {height} pt)"
            )));
        }
        if width > MAX_PAGE_SIDE_PT || height > MAX_PAGE_SIDE_PT {
            return Err(crate::error::DarkModeError::parse(format!(
                "page {page_index} is {width} x {height} pt, larger than {MAX_PAGE_SIDE_PT} pt"
            )));
        }

        Ok((width, height))
    }

    /// 指定ページ(0-indexed)が画像XObjectを1つ以上参照しているかを返す。
    ///
    /// ページ自身のResources、ページツリーから継承したResources、
    /// およびページが使うForm XObjectのResources（再帰）を調べる。
    /// インライン画像（BI ... EI）は対象外。
    pub fn page_has_images(&self, page_index: u32) -> crate::error::Result<bool> {
        let page_id = self.page_id(page_index)?;
        let page_dict = self.doc.get_dictionary(page_id)?;

        // 継承は最も近い祖先のResourcesだけが有効
        let resources = match inherited_attribute(&self.doc, page_dict, b"Resources")? {
            Some(obj) => resolve_dict(&self.doc, obj)?,
            None => None,
        };

        match resources {
            Some(dict) => self.resources_have_images(dict, &mut HashSet::new()),
            None => Ok(false),
        }
    }

    /// 指定ページ(0-indexed)を分類する。
    pub fn classify_page(&self, page_index: u32) -> crate::error::Result<PageKind> {
        if self.page_has_images(page_index)? {
            Ok(PageKind::ImageBearing)
        } else {
            Ok(PageKind::TextLike)
        }
    }

    /// リソース辞書のXObjectエントリにSubtype=Imageのストリームがあるかを調べる。
    /// Subtype=FormのXObjectはそのResourcesを再帰的に調べる。
    fn resources_have_images(
        &self,
        dict: &lopdf::Dictionary,
        visited: &mut HashSet<ObjectId>,
    ) -> crate::error::Result<bool> {
        let xobject_entry = match dict.get(b"XObject") {
            Ok(entry) => entry,
            Err(_) => return Ok(false),
        };

        let Some(xobject_dict) = resolve_dict(&self.doc, xobject_entry)? else {
            return Ok(false);
        };

        for (_name, value) in xobject_dict.iter() {
            let stream = match value {
                Object::Reference(id) => {
                    // Form XObjectの循環参照対策
                    if !visited.insert(*id) {
                        continue;
                    }
                    match self.doc.get_object(*id).and_then(Object::as_stream) {
                        Ok(s) => s,
                        Err(_) => continue,
                    }
                }
                Object::Stream(s) => s,
                _ => continue,
            };

            match stream.dict.get(b"Subtype").and_then(Object::as_name) {
                Ok(b"Image") => return Ok(true),
                Ok(b"Form") => {
                    let form_resources = match stream.dict.get(b"Resources") {
                        Ok(obj) => resolve_dict(&self.doc, obj).ok().flatten(),
                        Err(_) => None,
                    };
                    if let Some(res) = form_resources
                        && self.resources_have_images(res, visited)?
                    {
                        return Ok(true);
                    }
                }
                _ => {}
            }
        }

        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_rejects_empty_buffer() {
        let result = PdfReader::from_bytes(&[]);
        assert!(matches!(
            result,
            Err(crate::error::DarkModeError::ParseError(_))
        ));
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        let result = PdfReader::from_bytes(b"this is not a pdf at all");
        assert!(matches!(
            result,
            Err(crate::error::DarkModeError::ParseError(_))
        ));
    }
}
