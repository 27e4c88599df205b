//! 折叠面板合并
//!
//! 以商品目录的面板序列为准逐位遍历：同一位置有编辑器条目时交给 `combine`
//! 合成，否则保留目录条目。结果长度恒等于目录长度，多出的编辑器条目被丢弃。

use serde::{Deserialize, Serialize};

/// 折叠面板
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AccordionSection<C> {
    pub title: String,
    pub content: C,
}

impl<C> AccordionSection<C> {
    pub fn new(title: impl Into<String>, content: C) -> Self {
        Self {
            title: title.into(),
            content,
        }
    }

    /// 保留标题，替换内容
    pub fn map_content<D>(self, f: impl FnOnce(C) -> D) -> AccordionSection<D> {
        AccordionSection {
            title: self.title,
            content: f(self.content),
        }
    }
}

/// 按位合并目录条目与编辑器条目
pub fn merge_sections<T, E, F>(catalog: impl IntoIterator<Item = T>, editor: &[E], mut combine: F) -> Vec<T>
where
    F: FnMut(T, &E) -> T,
{
    catalog
        .into_iter()
        .enumerate()
        .map(|(index, entry)| match editor.get(index) {
            Some(overlay) => combine(entry, overlay),
            None => entry,
        })
        .collect()
}
