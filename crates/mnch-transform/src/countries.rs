//! Embedded ISO 3166-1 alpha-3 table with canonical English names.
//!
//! Names follow the UN M49 spelling used by WPP and UNICEF exports. `XKX`
//! (Kosovo) is included because UN agencies publish figures under it.

/// One `CODE|Name` pair per line.
const COUNTRY_TABLE: &str = "\
AFG|Afghanistan
ALA|Aland Islands
ALB|Albania
DZA|Algeria
ASM|American Samoa
AND|Andorra
AGO|Angola
AIA|Anguilla
ATA|Antarctica
ATG|Antigua and Barbuda
ARG|Argentina
ARM|Armenia
ABW|Aruba
AUS|Australia
AUT|Austria
AZE|Azerbaijan
BHS|Bahamas
BHR|Bahrain
BGD|Bangladesh
BRB|Barbados
BLR|Belarus
BEL|Belgium
BLZ|Belize
BEN|Benin
BMU|Bermuda
BTN|Bhutan
BOL|Bolivia (Plurinational State of)
BES|Bonaire, Sint Eustatius and Saba
BIH|Bosnia and Herzegovina
BWA|Botswana
BVT|Bouvet Island
BRA|Brazil
IOT|British Indian Ocean Territory
VGB|British Virgin Islands
BRN|Brunei Darussalam
BGR|Bulgaria
BFA|Burkina Faso
BDI|Burundi
CPV|Cabo Verde
KHM|Cambodia
CMR|Cameroon
CAN|Canada
CYM|Cayman Islands
CAF|Central African Republic
TCD|Chad
CHL|Chile
CHN|China
HKG|China, Hong Kong SAR
MAC|China, Macao SAR
CXR|Christmas Island
CCK|Cocos (Keeling) Islands
COL|Colombia
COM|Comoros
COG|Congo
COK|Cook Islands
CRI|Costa Rica
CIV|Cote d'Ivoire
HRV|Croatia
CUB|Cuba
CUW|Curacao
CYP|Cyprus
CZE|Czechia
PRK|Democratic People's Republic of Korea
COD|Democratic Republic of the Congo
DNK|Denmark
DJI|Djibouti
DMA|Dominica
DOM|Dominican Republic
ECU|Ecuador
EGY|Egypt
SLV|El Salvador
GNQ|Equatorial Guinea
ERI|Eritrea
EST|Estonia
SWZ|Eswatini
ETH|Ethiopia
FLK|Falkland Islands (Malvinas)
FRO|Faroe Islands
FJI|Fiji
FIN|Finland
FRA|France
GUF|French Guiana
PYF|French Polynesia
ATF|French Southern Territories
GAB|Gabon
GMB|Gambia
GEO|Georgia
DEU|Germany
GHA|Ghana
GIB|Gibraltar
GRC|Greece
GRL|Greenland
GRD|Grenada
GLP|Guadeloupe
GUM|Guam
GTM|Guatemala
GGY|Guernsey
GIN|Guinea
GNB|Guinea-Bissau
GUY|Guyana
HTI|Haiti
HMD|Heard Island and McDonald Islands
VAT|Holy See
HND|Honduras
HUN|Hungary
ISL|Iceland
IND|India
IDN|Indonesia
IRN|Iran (Islamic Republic of)
IRQ|Iraq
IRL|Ireland
IMN|Isle of Man
ISR|Israel
ITA|Italy
JAM|Jamaica
JPN|Japan
JEY|Jersey
JOR|Jordan
KAZ|Kazakhstan
KEN|Kenya
KIR|Kiribati
XKX|Kosovo
KWT|Kuwait
KGZ|Kyrgyzstan
LAO|Lao People's Democratic Republic
LVA|Latvia
LBN|Lebanon
LSO|Lesotho
LBR|Liberia
LBY|Libya
LIE|Liechtenstein
LTU|Lithuania
LUX|Luxembourg
MDG|Madagascar
MWI|Malawi
MYS|Malaysia
MDV|Maldives
MLI|Mali
MLT|Malta
MHL|Marshall Islands
MTQ|Martinique
MRT|Mauritania
MUS|Mauritius
MYT|Mayotte
MEX|Mexico
FSM|Micronesia (Federated States of)
MCO|Monaco
MNG|Mongolia
MNE|Montenegro
MSR|Montserrat
MAR|Morocco
MOZ|Mozambique
MMR|Myanmar
NAM|Namibia
NRU|Nauru
NPL|Nepal
NLD|Netherlands
NCL|New Caledonia
NZL|New Zealand
NIC|Nicaragua
NER|Niger
NGA|Nigeria
NIU|Niue
NFK|Norfolk Island
MKD|North Macedonia
MNP|Northern Mariana Islands
NOR|Norway
OMN|Oman
PAK|Pakistan
PLW|Palau
PSE|State of Palestine
PAN|Panama
PNG|Papua New Guinea
PRY|Paraguay
PER|Peru
PHL|Philippines
PCN|Pitcairn
POL|Poland
PRT|Portugal
PRI|Puerto Rico
QAT|Qatar
KOR|Republic of Korea
MDA|Republic of Moldova
REU|Reunion
ROU|Romania
RUS|Russian Federation
RWA|Rwanda
BLM|Saint Barthelemy
SHN|Saint Helena
KNA|Saint Kitts and Nevis
LCA|Saint Lucia
MAF|Saint Martin (French part)
SPM|Saint Pierre and Miquelon
VCT|Saint Vincent and the Grenadines
WSM|Samoa
SMR|San Marino
STP|Sao Tome and Principe
SAU|Saudi Arabia
SEN|Senegal
SRB|Serbia
SYC|Seychelles
SLE|Sierra Leone
SGP|Singapore
SXM|Sint Maarten (Dutch part)
SVK|Slovakia
SVN|Slovenia
SLB|Solomon Islands
SOM|Somalia
ZAF|South Africa
SGS|South Georgia and the South Sandwich Islands
SSD|South Sudan
ESP|Spain
LKA|Sri Lanka
SDN|Sudan
SUR|Suriname
SJM|Svalbard and Jan Mayen
SWE|Sweden
CHE|Switzerland
SYR|Syrian Arab Republic
TWN|Taiwan
TJK|Tajikistan
THA|Thailand
TLS|Timor-Leste
TGO|Togo
TKL|Tokelau
TON|Tonga
TTO|Trinidad and Tobago
TUN|Tunisia
TUR|Turkiye
TKM|Turkmenistan
TCA|Turks and Caicos Islands
TUV|Tuvalu
UGA|Uganda
UKR|Ukraine
ARE|United Arab Emirates
GBR|United Kingdom
TZA|United Republic of Tanzania
UMI|United States Minor Outlying Islands
USA|United States of America
VIR|United States Virgin Islands
URY|Uruguay
UZB|Uzbekistan
VUT|Vanuatu
VEN|Venezuela (Bolivarian Republic of)
VNM|Viet Nam
WLF|Wallis and Futuna Islands
ESH|Western Sahara
YEM|Yemen
ZMB|Zambia
ZWE|Zimbabwe";

/// Common alternative spellings.
const ALIAS_TABLE: &str = "\
BOL|Bolivia
CPV|Cape Verde
CIV|Côte d'Ivoire
CIV|Ivory Coast
CZE|Czech Republic
PRK|North Korea
COD|DR Congo
COD|Congo, Democratic Republic of the
COG|Republic of the Congo
SWZ|Swaziland
GMB|The Gambia
IRN|Iran
LAO|Laos
FSM|Micronesia
MKD|The former Yugoslav Republic of Macedonia
PSE|Palestine
KOR|South Korea
MDA|Moldova
RUS|Russia
SYR|Syria
TZA|Tanzania
TUR|Turkey
TUR|Türkiye
GBR|United Kingdom of Great Britain and Northern Ireland
USA|United States
VEN|Venezuela
VNM|Vietnam
CUW|Curaçao
REU|Réunion
BLM|Saint Barthélemy
ALA|Åland Islands";

fn pairs(table: &'static str) -> impl Iterator<Item = (&'static str, &'static str)> {
    table.lines().filter_map(|line| line.split_once('|'))
}

/// All `(code, canonical name)` pairs.
pub fn countries() -> impl Iterator<Item = (&'static str, &'static str)> {
    pairs(COUNTRY_TABLE)
}

/// Alternative spellings as `(code, name)` pairs.
pub fn aliases() -> impl Iterator<Item = (&'static str, &'static str)> {
    pairs(ALIAS_TABLE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn codes_are_unique_and_well_formed() {
        let mut seen = BTreeSet::new();
        for (code, name) in countries() {
            assert_eq!(code.len(), 3, "{code}");
            assert!(code.chars().all(|c| c.is_ascii_uppercase()), "{code}");
            assert!(!name.is_empty());
            assert!(seen.insert(code), "duplicate {code}");
        }
        assert!(seen.len() > 240);
    }

    #[test]
    fn aliases_point_at_known_codes() {
        let codes: BTreeSet<&str> = countries().map(|(code, _)| code).collect();
        for (code, _) in aliases() {
            assert!(codes.contains(code), "{code}");
        }
    }
}
