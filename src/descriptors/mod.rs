/*!
 * Descriptors Module
 * The shared virtual-fd table
 */

mod table;

pub use table::{DescriptorEntry, DescriptorTable, HostResource};
