//! Small quote table shared by the unit tests of this crate.

use crate::dataset::QuoteDataset;

pub(crate) const SAMPLE_CSV: &str = r#"quote,author,year_born,year_died,bio,date_spoken,source,topics,comments
"The most dangerous phrase in the language is, 'We've always done it this way.'",Grace Hopper,1906,1992,"Grace Hopper was an American computer scientist and United States Navy rear admiral.",1976,Computerworld,"innovation, change",
"It's easier to ask forgiveness than it is to get permission.",Grace Hopper,1906,1992,"A duplicate bio that must be ignored.",1986,Chips Ahoy,leadership,
"One accurate measurement is worth a thousand expert opinions.",Grace Hopper,1906,1992,,,Lecture,"Mathematics, Measurement",
"The Analytical Engine weaves algebraical patterns just as the Jacquard loom weaves flowers and leaves.",Ada Lovelace,1815,1852,"Ada Lovelace was an English mathematician who wrote the first published algorithm for a machine.",1843,Notes,"mathematics,poetry",
"Imagination is the Discovering Faculty, pre-eminently.",Ada Lovelace,1815,1852,,1841,Letters,imagination,
"I counted everything.",Katherine Johnson,1918,2020,,,Interview,"mathematics, counting",first bio cell intentionally blank
"Like what you do, and then you will do your best.",Katherine Johnson,1918,2020,"Katherine Johnson was a NASA mathematician whose orbital calculations made crewed spaceflight possible.",,Interview,work,
"There was no choice but to be pioneers.",Margaret Hamilton,1936,,"Margaret Hamilton is a computer scientist who led the Apollo flight software team.",,Interview,"software, pioneering",
"#;

pub(crate) fn sample_dataset() -> QuoteDataset {
    match QuoteDataset::from_reader(SAMPLE_CSV.as_bytes()) {
        Ok(dataset) => dataset,
        Err(error) => panic!("sample dataset must load: {error}"),
    }
}
