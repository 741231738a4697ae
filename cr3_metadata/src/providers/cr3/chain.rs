use cr3_metadata_types::exif::ifd::IfdGroup;

use super::header::Cr3Header;
use crate::{
    exif::Directory,
    providers::shared::bmff::{BoxTarget, find_box},
};

/// Each metadata directory lives in a box named `CMT` plus a digit.
pub const CMT_PREFIX: [u8; 3] = *b"CMT";

/// The group held by each `CMT` box, in order: `CMT1` through `CMT4`.
pub const ROLES: [IfdGroup; 4] = [IfdGroup::_0, IfdGroup::Exif, IfdGroup::Canon, IfdGroup::Gps];

/// The box type for the role at `index` in [`ROLES`].
pub const fn role_code(index: u8) -> [u8; 4] {
    [CMT_PREFIX[0], CMT_PREFIX[1], CMT_PREFIX[2], b'1' + index]
}

/// Finds and builds each metadata directory, then links them into a chain.
///
/// Walking the returned chain visits directories in the order they were
/// built: IFD 0, Exif, Canon, then GPS. Earlier directories take precedence
/// when the chain is decoded.
///
/// Missing directories, and ones that fail to build, are skipped. When
/// nothing could be built, this returns `None`.
pub fn build_chain(input: &[u8]) -> Option<Directory> {
    let mut header = Cr3Header::default();
    let mut built: Vec<Directory> = Vec::with_capacity(ROLES.len());

    for (index, role) in (0_u8..).zip(ROLES) {
        let code = role_code(index);
        let Some(offset) = find_box(input, BoxTarget::Type(code)).filter(|offset| *offset > 0)
        else {
            log::debug!("No `{}` box in this file.", code.escape_ascii());
            continue;
        };

        header.reposition(offset);
        match Directory::build(input, role, &header) {
            Ok(directory) => {
                log::trace!("Built {role:?} directory from `{}`.", code.escape_ascii());
                built.push(directory);
            }
            Err(e) => log::warn!(
                "Failed to build {role:?} directory from `{}`. Skipping it. err: {e}",
                code.escape_ascii()
            ),
        }
    }

    log::debug!("Built `{}` metadata directories.", built.len());
    link(built)
}

/// Links directories so that each one's `next` is the one built after it.
///
/// This goes from the back, so every directory owns the rest of the chain
/// when it's linked.
fn link(built: Vec<Directory>) -> Option<Directory> {
    let mut tail: Option<Box<Directory>> = None;
    for mut directory in built.into_iter().rev() {
        directory.next = tail;
        tail = Some(Box::new(directory));
    }
    tail.map(|head| *head)
}
