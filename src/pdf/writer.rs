// 出力PDF組立: 元ページのディープコピーと、再着色ラスタの全面画像ページ

use std::collections::{HashMap, VecDeque};

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

use super::inherited_attribute;
use crate::recolor::encoder::EncodedImage;

/// ページツリーから継承されうるページ属性。
const INHERITABLE_KEYS: &[&[u8]] = &[b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// 全面画像ページで使うXObject名。
const IMAGE_XOBJECT_NAME: &str = "Im0";

/// 出力PDFをページ単位で組み立てる。
///
/// Pagesノードのオブジェクト番号は作成時に確保し、`finish` でKidsとCountを確定させる。
pub struct DarkPageWriter {
    doc: Document,
    pages_id: ObjectId,
    kids: Vec<Object>,
}

impl Default for DarkPageWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DarkPageWriter {
    /// 空の出力ドキュメントを作成する。
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            kids: Vec::new(),
        }
    }

    /// これまでに追加したページ数を返す。
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// 全面画像ページ用のコンテンツストリームバイト列を生成する。
    ///
    /// `q <width> 0 0 <height> 0 0 cm /<name> Do Q`
    pub fn build_image_content_stream(name: &str, width: u32, height: u32) -> Vec<u8> {
        format!("q {width} 0 0 {height} 0 0 cm /{name} Do Q").into_bytes()
    }

    /// 画像XObjectを追加する。
    ///
    /// 戻り値はXObjectのオブジェクトID。
    fn add_image_xobject(&mut self, image: &EncodedImage) -> ObjectId {
        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => image.width as i64,
            "Height" => image.height as i64,
            "ColorSpace" => image.color_space.to_object(),
            "BitsPerComponent" => image.bits_per_component as i64,
            "Filter" => "FlateDecode",
        };
        let stream = Stream::new(dict, image.data.clone());
        self.doc.add_object(Object::Stream(stream))
    }

    /// 画像1枚だけを全面に配置したページを追加する。
    ///
    /// ページサイズは画像のピクセル寸法と同じ（1ピクセル = 1ポイント）。
    pub fn write_image_page(&mut self, image: &EncodedImage) -> crate::error::Result<ObjectId> {
        if image.width == 0 || image.height == 0 {
            return Err(crate::error::DarkModeError::encode(format!(
                "image has zero dimension: {}x{}",
                image.width, image.height
            )));
        }

        let width = image.width;
        let height = image.height;

        let image_id = self.add_image_xobject(image);

        let mut xobject_dict = Dictionary::new();
        xobject_dict.set(IMAGE_XOBJECT_NAME, Object::Reference(image_id));
        let resources_id = self.doc.add_object(dictionary! {
            "XObject" => Object::Dictionary(xobject_dict),
        });

        let content_bytes = Self::build_image_content_stream(IMAGE_XOBJECT_NAME, width, height);
        let content_id = self
            .doc
            .add_object(Object::Stream(Stream::new(dictionary! {}, content_bytes)));

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(width as i64),
                Object::Integer(height as i64),
            ],
            "Resources" => resources_id,
            "Contents" => content_id,
        });

        self.kids.push(page_id.into());
        Ok(page_id)
    }

    /// 元ドキュメントのページ(ObjectId指定)を、参照先オブジェクトごと出力にコピーする。
    ///
    /// オブジェクト番号は出力側で振り直す。ページ自身に無い継承属性は祖先から補完する。
    /// 他のページ、ページツリーノード、Catalogへの参照はnullに置き換え、
    /// 元ドキュメント全体を引き込まないようにする。
    pub fn copy_page_from(
        &mut self,
        source: &Document,
        page_id: ObjectId,
    ) -> crate::error::Result<ObjectId> {
        let mut page_dict = source.get_dictionary(page_id)?.clone();

        for key in INHERITABLE_KEYS {
            if page_dict.has(key) {
                continue;
            }
            let value = inherited_attribute(source, &page_dict, key)?.cloned();
            if let Some(value) = value {
                page_dict.set(key.to_vec(), value);
            }
        }
        page_dict.remove(b"Parent");

        let new_page_id = self.doc.new_object_id();
        let mut copier = ObjectCopier::new(source, page_id);
        copier.id_map.insert(page_id, new_page_id);

        let mut copied = copier.copy_dictionary(&page_dict, &mut self.doc);
        copied.set("Parent", self.pages_id);
        self.doc
            .objects
            .insert(new_page_id, Object::Dictionary(copied));

        copier.drain(&mut self.doc)?;

        self.kids.push(new_page_id.into());
        Ok(new_page_id)
    }

    /// ページツリーとCatalogを確定させ、PDFドキュメントをバイト列として出力する。
    pub fn finish(mut self) -> crate::error::Result<Vec<u8>> {
        let count = self.kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => self.kids,
            "Count" => count,
        };
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        self.doc
            .save_to(&mut buf)
            .map_err(|e| crate::error::DarkModeError::serialization(e.to_string()))?;
        Ok(buf)
    }
}

/// 参照の付け替えを伴うオブジェクトのディープコピー。
///
/// 参照先は発見時に新しい番号を確保してキューに積み、`drain` で順に複製する。
struct ObjectCopier<'a> {
    source: &'a Document,
    root_page: ObjectId,
    id_map: HashMap<ObjectId, ObjectId>,
    pending: VecDeque<(ObjectId, ObjectId)>,
}

impl<'a> ObjectCopier<'a> {
    fn new(source: &'a Document, root_page: ObjectId) -> Self {
        Self {
            source,
            root_page,
            id_map: HashMap::new(),
            pending: VecDeque::new(),
        }
    }

    /// 他ページ・ページツリー・Catalogを指す参照かどうか。
    fn is_foreign_structure(&self, id: ObjectId) -> bool {
        if id == self.root_page {
            return false;
        }
        let Ok(dict) = self.source.get_dictionary(id) else {
            return false;
        };
        matches!(
            dict.get(b"Type").and_then(Object::as_name),
            Ok(b"Page" | b"Pages" | b"Catalog")
        )
    }

    fn map_reference(&mut self, id: ObjectId, target: &mut Document) -> Object {
        if let Some(&new_id) = self.id_map.get(&id) {
            return Object::Reference(new_id);
        }
        if self.is_foreign_structure(id) || self.source.get_object(id).is_err() {
            return Object::Null;
        }
        let new_id = target.new_object_id();
        self.id_map.insert(id, new_id);
        self.pending.push_back((id, new_id));
        Object::Reference(new_id)
    }

    fn copy_object(&mut self, obj: &Object, target: &mut Document) -> Object {
        match obj {
            Object::Reference(id) => self.map_reference(*id, target),
            Object::Array(items) => Object::Array(
                items
                    .iter()
                    .map(|item| self.copy_object(item, target))
                    .collect(),
            ),
            Object::Dictionary(dict) => Object::Dictionary(self.copy_dictionary(dict, target)),
            Object::Stream(stream) => {
                let mut copied = stream.clone();
                copied.dict = self.copy_dictionary(&stream.dict, target);
                Object::Stream(copied)
            }
            other => other.clone(),
        }
    }

    fn copy_dictionary(&mut self, dict: &Dictionary, target: &mut Document) -> Dictionary {
        let mut copied = Dictionary::new();
        for (key, value) in dict.iter() {
            copied.set(key.clone(), self.copy_object(value, target));
        }
        copied
    }

    fn drain(&mut self, target: &mut Document) -> crate::error::Result<()> {
        while let Some((old_id, new_id)) = self.pending.pop_front() {
            let source = self.source;
            let original = source.get_object(old_id)?;
            let copied = self.copy_object(original, target);
            target.objects.insert(new_id, copied);
        }
        Ok(())
    }
}
