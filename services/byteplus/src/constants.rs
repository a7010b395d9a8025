// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

// Headers used in byteplus services.
pub const X_DATE: &str = "x-date";
pub const X_CONTENT_SHA_256: &str = "x-content-sha256";

// Env values used in byteplus services.
pub const BYTEPLUS_ACCESS_KEY_ID: &str = "BYTEPLUS_ACCESS_KEY_ID";
pub const BYTEPLUS_SECRET_ACCESS_KEY: &str = "BYTEPLUS_SECRET_ACCESS_KEY";

/// Content type the scheme signs when the caller did not set one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Header names bound into every signature, in canonical order.
///
/// The server recomputes the signature over exactly this set; it never grows
/// with extra request headers.
pub const SIGNED_HEADERS: [&str; 4] = ["host", "x-date", "x-content-sha256", "content-type"];

/// AsciiSet for the canonical query encoding.
///
/// Percent-encode every byte except the unreserved characters 'A'-'Z',
/// 'a'-'z', '0'-'9', '-', '.', '_' and '~'. A space therefore becomes `%20`,
/// never `+`.
pub static BYTEPLUS_QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
